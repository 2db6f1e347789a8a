//! Employee Repository (read side)

use super::RepoResult;
use crate::db::Storage;
use crate::db::storage::EMPLOYEES_TABLE;
use shared::models::{Employee, EmployeeId};

#[derive(Clone)]
pub struct EmployeeRepository {
    storage: Storage,
}

impl EmployeeRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all employees, id order
    pub fn find_all(&self) -> RepoResult<Vec<Employee>> {
        Ok(self.storage.read_all(EMPLOYEES_TABLE)?)
    }

    /// Employees still on the roster (active or awaiting a decision)
    pub fn find_on_roster(&self) -> RepoResult<Vec<Employee>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|e| e.status.is_on_roster())
            .collect())
    }

    /// Find employee by id
    pub fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        Ok(self.storage.read(EMPLOYEES_TABLE, id)?)
    }
}
