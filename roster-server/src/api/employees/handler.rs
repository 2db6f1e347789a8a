//! Employee API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppJson, AppResult, ok};
use shared::client::OnboardResponse;
use shared::models::{Employee, EmployeeCreate};

/// List employees on the roster, scoped to the caller
pub async fn list_active(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Employee>>>> {
    Ok(ok(state.lifecycle.list_active_employees(&user)?))
}

/// Add an employee (opens an onboarding change)
pub async fn onboard(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<EmployeeCreate>,
) -> AppResult<Json<ApiResponse<OnboardResponse>>> {
    Ok(ok(state.lifecycle.onboard(&user, payload)?))
}
