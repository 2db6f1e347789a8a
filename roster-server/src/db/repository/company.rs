//! Company Repository

use super::{RepoError, RepoResult};
use crate::db::{Storage, StorageError};
use crate::db::storage::{self, COMPANIES_TABLE};
use shared::models::{Company, CompanyId};

#[derive(Clone)]
pub struct CompanyRepository {
    storage: Storage,
}

impl CompanyRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all companies, id order
    pub fn find_all(&self) -> RepoResult<Vec<Company>> {
        Ok(self.storage.read_all(COMPANIES_TABLE)?)
    }

    /// Find company by id
    pub fn find_by_id(&self, id: CompanyId) -> RepoResult<Option<Company>> {
        Ok(self.storage.read(COMPANIES_TABLE, id)?)
    }

    /// Find company by exact name
    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Company>> {
        Ok(self.find_all()?.into_iter().find(|c| c.name == name))
    }

    /// Create a new company (name must be unique)
    pub fn create(&self, name: &str) -> RepoResult<Company> {
        let txn = self.storage.begin_write()?;
        let existing: Vec<Company> = storage::scan(&txn, COMPANIES_TABLE)?;
        if existing.iter().any(|c| c.name == name) {
            return Err(RepoError::Duplicate(format!(
                "Company '{}' already exists",
                name
            )));
        }

        let company = Company {
            id: storage::next_id(&txn, "company")?,
            name: name.to_string(),
        };
        storage::put(&txn, COMPANIES_TABLE, company.id, &company)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(company)
    }
}
