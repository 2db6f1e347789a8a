//! Directory Models (companies and projects)

use serde::{Deserialize, Serialize};

pub type CompanyId = i64;
pub type ProjectId = i64;

/// Company entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

/// Project entity
///
/// `company_id` is fixed at creation; no operation rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub company_id: CompanyId,
}

/// Create company payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
}

/// Create project payload (company comes from the path)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
}

/// Where an employee sits: a company and, optionally, one of its projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub company_id: CompanyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl Assignment {
    pub fn new(company_id: CompanyId, project_id: Option<ProjectId>) -> Self {
        Self {
            company_id,
            project_id,
        }
    }
}
