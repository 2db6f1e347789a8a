//! User Repository

use super::{RepoError, RepoResult, now_millis};
use crate::db::models::UserRecord;
use crate::db::storage::{self, USERNAMES_TABLE, USERS_TABLE};
use crate::db::{Storage, StorageError};
use redb::ReadableTable;
use shared::models::Role;

#[derive(Clone)]
pub struct UserRepository {
    storage: Storage,
}

impl UserRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find user by id
    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<UserRecord>> {
        Ok(self.storage.read(USERS_TABLE, id)?)
    }

    /// Find user by username
    pub fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRecord>> {
        match self.storage.user_id_by_name(username)? {
            Some(id) => self.find_by_id(id),
            None => Ok(None),
        }
    }

    /// Number of registered accounts
    pub fn count(&self) -> RepoResult<usize> {
        Ok(self.storage.read_all::<UserRecord>(USERS_TABLE)?.len())
    }

    /// Create a new user from an already hashed password
    ///
    /// The username check, the `first_only` check and the insert share one
    /// write transaction. With `first_only` the insert fails unless no
    /// account exists yet.
    pub fn create(
        &self,
        username: &str,
        hash_pass: String,
        role: Role,
        first_only: bool,
    ) -> RepoResult<UserRecord> {
        let txn = self.storage.begin_write()?;
        if first_only {
            let users = txn.open_table(USERS_TABLE).map_err(StorageError::from)?;
            if users.first().map_err(StorageError::from)?.is_some() {
                return Err(RepoError::Forbidden(
                    "Only the first account may be created with this role".to_string(),
                ));
            }
        }
        {
            let mut index = txn.open_table(USERNAMES_TABLE).map_err(StorageError::from)?;
            if index.get(username).map_err(StorageError::from)?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "Username '{}' already exists",
                    username
                )));
            }

            let id = storage::next_id(&txn, "user")?;
            index.insert(username, id).map_err(StorageError::from)?;

            let user = UserRecord {
                id,
                username: username.to_string(),
                hash_pass,
                role,
                created_at: now_millis(),
            };
            storage::put(&txn, USERS_TABLE, id, &user)?;
        }
        txn.commit().map_err(StorageError::from)?;

        self.find_by_username(username)?
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
