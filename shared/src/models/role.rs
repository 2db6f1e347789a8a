//! Role Model
//!
//! A role is a closed set of variants, each carrying the id it is scoped to.
//! Every visibility decision goes through the pure functions below.

use serde::{Deserialize, Serialize};

use super::change::PendingChange;
use super::company::{Assignment, CompanyId, ProjectId};
use super::employee::Employee;

/// User role with its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    /// Sees and acts on everything
    SuperAdmin,
    /// Limited to one company and all of its projects
    CompanyAdmin { company_id: CompanyId },
    /// Limited to one project
    ProjectLead { project_id: ProjectId },
}

impl Role {
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::CompanyAdmin { .. } => "company_admin",
            Self::ProjectLead { .. } => "project_lead",
        }
    }

    /// Whether an assignment lies inside this role's scope
    pub fn covers(&self, assignment: &Assignment) -> bool {
        match self {
            Self::SuperAdmin => true,
            Self::CompanyAdmin { company_id } => assignment.company_id == *company_id,
            Self::ProjectLead { project_id } => assignment.project_id == Some(*project_id),
        }
    }

    /// A change is visible when its source or its destination is covered
    pub fn can_see_change(&self, change: &PendingChange) -> bool {
        change
            .source
            .iter()
            .chain(change.destination.iter())
            .any(|a| self.covers(a))
    }

    /// An employee is visible when its current assignment is covered, or when
    /// its unresolved change (passed in by the caller) is visible.
    pub fn can_see_employee(&self, employee: &Employee, pending: Option<&PendingChange>) -> bool {
        if self.is_super_admin() {
            return true;
        }
        if employee.assignment().is_some_and(|a| self.covers(&a)) {
            return true;
        }
        pending.is_some_and(|c| self.can_see_change(c))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => f.write_str("super_admin"),
            Self::CompanyAdmin { company_id } => write!(f, "company_admin({company_id})"),
            Self::ProjectLead { project_id } => write!(f, "project_lead({project_id})"),
        }
    }
}
