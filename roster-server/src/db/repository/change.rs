//! Pending Change Repository (read side)

use super::RepoResult;
use crate::db::Storage;
use crate::db::storage::CHANGES_TABLE;
use shared::models::{ChangeId, PendingChange};

#[derive(Clone)]
pub struct ChangeRepository {
    storage: Storage,
}

impl ChangeRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all changes, id order
    pub fn find_all(&self) -> RepoResult<Vec<PendingChange>> {
        Ok(self.storage.read_all(CHANGES_TABLE)?)
    }

    /// Changes still awaiting a decision
    pub fn find_unresolved(&self) -> RepoResult<Vec<PendingChange>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(PendingChange::is_pending)
            .collect())
    }

    /// Find change by id
    pub fn find_by_id(&self, id: ChangeId) -> RepoResult<Option<PendingChange>> {
        Ok(self.storage.read(CHANGES_TABLE, id)?)
    }
}
