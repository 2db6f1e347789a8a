//! Pending Change API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppJson, AppPath, AppResult, ok, ok_with_message};
use shared::models::{ChangeId, EmployeeId, PendingChange, ResignRequest, TransferRequest};

/// List unresolved changes visible to the caller
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<PendingChange>>>> {
    Ok(ok(state.lifecycle.list_pending_changes(&user)?))
}

/// Submit a transfer for an employee
pub async fn transfer(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(employee_id): AppPath<EmployeeId>,
    AppJson(payload): AppJson<TransferRequest>,
) -> AppResult<Json<ApiResponse<PendingChange>>> {
    let change = state.lifecycle.submit_transfer(&user, employee_id, payload)?;
    Ok(ok_with_message(change, "Transfer request submitted"))
}

/// Submit a resignation for an employee
pub async fn resign(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(employee_id): AppPath<EmployeeId>,
    AppJson(payload): AppJson<ResignRequest>,
) -> AppResult<Json<ApiResponse<PendingChange>>> {
    let change = state.lifecycle.submit_resign(&user, employee_id, payload)?;
    Ok(ok_with_message(change, "Resignation request submitted"))
}

/// Approve a pending change
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(change_id): AppPath<ChangeId>,
) -> AppResult<Json<ApiResponse<PendingChange>>> {
    let change = state.lifecycle.approve(&user, change_id)?;
    Ok(ok_with_message(change, "Change approved"))
}

/// Reject a pending change
pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppPath(change_id): AppPath<ChangeId>,
) -> AppResult<Json<ApiResponse<PendingChange>>> {
    let change = state.lifecycle.reject(&user, change_id)?;
    Ok(ok_with_message(change, "Change rejected"))
}
