//! Pending Change Model
//!
//! A pending change asks to move an employee through its lifecycle:
//!
//! ```text
//!            approve
//!   pending ─────────▶ approved
//!      │
//!      └─────────────▶ rejected
//!            reject
//! ```
//!
//! `approved` and `rejected` are terminal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::company::{Assignment, CompanyId, ProjectId};
use super::employee::EmployeeId;

pub type ChangeId = i64;

/// What the change does to the employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Onboard,
    Transfer,
    Resign,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboard => "onboard",
            Self::Transfer => "transfer",
            Self::Resign => "resign",
        }
    }

    /// Whether a change of this kind records the employee's previous assignment
    pub fn has_source(&self) -> bool {
        matches!(self, Self::Transfer | Self::Resign)
    }

    /// Whether a change of this kind records a new assignment
    pub fn has_destination(&self) -> bool {
        matches!(self, Self::Onboard | Self::Transfer)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Pending,
    Approved,
    Rejected,
}

impl ChangeStatus {
    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Pending change entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub id: ChangeId,
    pub kind: ChangeKind,
    pub employee_id: EmployeeId,
    /// Copied from the employee at submission so lists render without a join
    pub employee_name: String,
    /// Assignment before the change (transfer, resign)
    pub source: Option<Assignment>,
    /// Assignment after the change (onboard, transfer)
    pub destination: Option<Assignment>,
    pub effective_date: NaiveDate,
    pub status: ChangeStatus,
    pub creator_id: i64,
    /// Unix millis
    pub created_at: i64,
    #[serde(default)]
    pub resolved_at: Option<i64>,
    #[serde(default)]
    pub resolved_by: Option<i64>,
}

impl PendingChange {
    /// Whether source/destination presence matches the kind
    pub fn is_well_formed(&self) -> bool {
        self.source.is_some() == self.kind.has_source()
            && self.destination.is_some() == self.kind.has_destination()
    }

    pub fn is_pending(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Transfer request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub new_company: CompanyId,
    pub new_project: ProjectId,
    pub effective_date: NaiveDate,
}

/// Resignation request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResignRequest {
    pub resign_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(kind: ChangeKind, source: bool, destination: bool) -> PendingChange {
        PendingChange {
            id: 1,
            kind,
            employee_id: 1,
            employee_name: "Ada".into(),
            source: source.then(|| Assignment::new(1, Some(1))),
            destination: destination.then(|| Assignment::new(2, Some(5))),
            effective_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: ChangeStatus::Pending,
            creator_id: 1,
            created_at: 0,
            resolved_at: None,
            resolved_by: None,
        }
    }

    #[test]
    fn test_shape_follows_kind() {
        assert!(change(ChangeKind::Onboard, false, true).is_well_formed());
        assert!(change(ChangeKind::Resign, true, false).is_well_formed());
        assert!(change(ChangeKind::Transfer, true, true).is_well_formed());

        assert!(!change(ChangeKind::Onboard, true, true).is_well_formed());
        assert!(!change(ChangeKind::Resign, true, true).is_well_formed());
        assert!(!change(ChangeKind::Transfer, false, true).is_well_formed());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ChangeStatus::Pending.is_terminal());
        assert!(ChangeStatus::Approved.is_terminal());
        assert!(ChangeStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(change(ChangeKind::Transfer, true, true)).unwrap();
        assert_eq!(json["kind"], "transfer");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["effective_date"], "2024-03-01");
        assert_eq!(json["destination"]["company_id"], 2);
        assert_eq!(json["destination"]["project_id"], 5);
    }
}
