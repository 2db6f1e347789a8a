//! Project Repository

use super::{RepoError, RepoResult};
use crate::db::storage::{self, COMPANIES_TABLE, PROJECTS_TABLE};
use crate::db::{Storage, StorageError};
use shared::models::{Company, CompanyId, Project, ProjectId};

#[derive(Clone)]
pub struct ProjectRepository {
    storage: Storage,
}

impl ProjectRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all projects, id order
    pub fn find_all(&self) -> RepoResult<Vec<Project>> {
        Ok(self.storage.read_all(PROJECTS_TABLE)?)
    }

    /// Find project by id
    pub fn find_by_id(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        Ok(self.storage.read(PROJECTS_TABLE, id)?)
    }

    /// Projects belonging to one company
    pub fn find_by_company(&self, company_id: CompanyId) -> RepoResult<Vec<Project>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|p| p.company_id == company_id)
            .collect())
    }

    /// Create a project under an existing company (name must be unique)
    pub fn create(&self, company_id: CompanyId, name: &str) -> RepoResult<Project> {
        let txn = self.storage.begin_write()?;
        let company: Option<Company> = storage::get(&txn, COMPANIES_TABLE, company_id)?;
        if company.is_none() {
            return Err(RepoError::NotFound(format!("Company {}", company_id)));
        }

        let existing: Vec<Project> = storage::scan(&txn, PROJECTS_TABLE)?;
        if existing.iter().any(|p| p.name == name) {
            return Err(RepoError::Duplicate(format!(
                "Project '{}' already exists",
                name
            )));
        }

        let project = Project {
            id: storage::next_id(&txn, "project")?,
            name: name.to_string(),
            company_id,
        };
        storage::put(&txn, PROJECTS_TABLE, project.id, &project)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::CompanyRepository;

    #[test]
    fn test_projects_scoped_to_company() {
        let storage = Storage::open_in_memory().unwrap();
        let companies = CompanyRepository::new(storage.clone());
        let repo = ProjectRepository::new(storage);

        let acme = companies.create("Acme").unwrap();
        let beta = companies.create("Beta").unwrap();
        repo.create(acme.id, "Apollo").unwrap();
        repo.create(beta.id, "Borealis").unwrap();
        repo.create(acme.id, "Artemis").unwrap();

        let names: Vec<String> = repo
            .find_by_company(acme.id)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Apollo", "Artemis"]);
        assert_eq!(repo.find_by_id(2).unwrap().unwrap().company_id, beta.id);
    }

    #[test]
    fn test_unknown_company_and_duplicates() {
        let storage = Storage::open_in_memory().unwrap();
        let acme = CompanyRepository::new(storage.clone()).create("Acme").unwrap();
        let repo = ProjectRepository::new(storage);

        assert!(matches!(repo.create(42, "Apollo"), Err(RepoError::NotFound(_))));
        repo.create(acme.id, "Apollo").unwrap();
        assert!(matches!(
            repo.create(acme.id, "Apollo"),
            Err(RepoError::Duplicate(_))
        ));
    }
}
