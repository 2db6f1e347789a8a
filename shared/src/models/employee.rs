//! Employee Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::change::ChangeId;
use super::company::{Assignment, CompanyId, ProjectId};

pub type EmployeeId = i64;

/// Employment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Working, no unresolved change
    Active,
    /// Has exactly one unresolved change
    PendingChange,
    /// Resignation approved
    Resigned,
    /// Onboarding was rejected; never became active
    Discarded,
}

impl EmployeeStatus {
    /// Statuses shown on the active roster
    pub fn is_on_roster(&self) -> bool {
        matches!(self, Self::Active | Self::PendingChange)
    }
}

/// Employee entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    /// Hire date, moved to the effective date of every approved change
    pub effective_date: NaiveDate,
    pub status: EmployeeStatus,
    pub company_id: Option<CompanyId>,
    pub project_id: Option<ProjectId>,
    /// User who created the record
    pub creator_id: i64,
    /// The unresolved change, if any
    pub pending_change_id: Option<ChangeId>,
    /// Unix millis
    pub created_at: i64,
}

impl Employee {
    /// Current assignment (None until onboarding is approved)
    pub fn assignment(&self) -> Option<Assignment> {
        self.company_id
            .map(|company_id| Assignment::new(company_id, self.project_id))
    }

    pub fn has_pending_change(&self) -> bool {
        self.pending_change_id.is_some()
    }
}

/// Add employee payload (starts an onboarding change)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub company_id: CompanyId,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}
