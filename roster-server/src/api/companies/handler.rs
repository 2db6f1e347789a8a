//! Company / Project API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppJson, AppPath, AppResult, ok};
use shared::models::{Company, CompanyCreate, CompanyId, Project, ProjectCreate};

/// List all companies
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Company>>>> {
    Ok(ok(state.directory.list_companies()?))
}

/// Create a company
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CompanyCreate>,
) -> AppResult<Json<ApiResponse<Company>>> {
    Ok(ok(state.directory.create_company(&payload.name)?))
}

/// List projects of a company
pub async fn list_projects(
    State(state): State<ServerState>,
    AppPath(id): AppPath<CompanyId>,
) -> AppResult<Json<ApiResponse<Vec<Project>>>> {
    Ok(ok(state.directory.list_projects(id)?))
}

/// Create a project under a company
pub async fn create_project(
    State(state): State<ServerState>,
    AppPath(id): AppPath<CompanyId>,
    AppJson(payload): AppJson<ProjectCreate>,
) -> AppResult<Json<ApiResponse<Project>>> {
    Ok(ok(state.directory.create_project(id, &payload.name)?))
}
