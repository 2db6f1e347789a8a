//! Pending change review
//!
//! Approve and reject go through the same two steps: `request_*` prepares a
//! [`PendingDecision`] the UI shows as a confirmation prompt, `confirm`
//! executes it. After every executed decision the list is re-fetched,
//! whatever the outcome, so approve and reject never diverge.

use shared::models::{ChangeId, ChangeKind, PendingChange};

use super::ListView;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult, RosterClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Reject => "Reject",
        }
    }
}

/// A decision awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    pub change_id: ChangeId,
    pub decision: Decision,
    pub kind: ChangeKind,
    pub employee_name: String,
}

impl PendingDecision {
    /// Confirmation prompt, e.g. "Approve transfer for E101?"
    pub fn prompt(&self) -> String {
        format!(
            "{} {} for {}?",
            self.decision.verb(),
            self.kind,
            self.employee_name
        )
    }
}

/// Scoped list of unresolved changes
#[derive(Debug, Clone, Default)]
pub struct ReviewFlow {
    view: ListView<PendingChange>,
}

impl ReviewFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> &[PendingChange] {
        self.view.items()
    }

    pub fn view(&self) -> &ListView<PendingChange> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<PendingChange> {
        &mut self.view
    }

    pub async fn refresh<C: HttpClient>(&mut self, client: &RosterClient<C>) -> ClientResult<()> {
        let ticket = self.view.begin_load();
        let result = client.list_pending_changes().await;
        self.view.apply(ticket, result).map(|_| ())
    }

    pub fn dismiss(&mut self) {
        self.view.dismiss();
    }

    pub fn request_approve(&self, change_id: ChangeId) -> ClientResult<PendingDecision> {
        self.request(change_id, Decision::Approve)
    }

    pub fn request_reject(&self, change_id: ChangeId) -> ClientResult<PendingDecision> {
        self.request(change_id, Decision::Reject)
    }

    fn request(&self, change_id: ChangeId, decision: Decision) -> ClientResult<PendingDecision> {
        let change = self
            .view
            .items()
            .iter()
            .find(|c| c.id == change_id)
            .ok_or_else(|| ClientError::NotFound {
                code: shared::ErrorCode::ChangeNotFound,
                message: format!("Change {} is not in the list", change_id),
            })?;

        Ok(PendingDecision {
            change_id,
            decision,
            kind: change.kind,
            employee_name: change.employee_name.clone(),
        })
    }

    /// Execute a confirmed decision, then re-fetch
    ///
    /// The decision's own result is returned. When the session was
    /// invalidated the list is cleared instead of re-fetched.
    pub async fn confirm<C: HttpClient>(
        &mut self,
        client: &RosterClient<C>,
        pending: PendingDecision,
    ) -> ClientResult<PendingChange> {
        let result = match pending.decision {
            Decision::Approve => client.approve(pending.change_id).await,
            Decision::Reject => client.reject(pending.change_id).await,
        };

        match &result {
            Ok(change) => {
                tracing::info!(change_id = change.id, status = ?change.status, "Decision applied");
            }
            Err(e) => {
                tracing::warn!(change_id = pending.change_id, error = %e, "Decision failed");
            }
        }

        if matches!(result, Err(ClientError::SessionInvalidated)) {
            self.view.dismiss();
        } else if let Err(e) = self.refresh(client).await {
            tracing::warn!(error = %e, "Review list refresh failed");
        }

        result
    }
}
