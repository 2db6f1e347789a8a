//! Authentication Handlers
//!
//! Handles login, registration, logout and the current-user lookup

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppJson, AppResult, ok, ok_with_message};

use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let result = state.accounts.authenticate(&req.username, &req.password);

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(state.config.auth_delay_ms)).await;

    let user = result?;
    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(ok(LoginResponse { token, user }))
}

/// Register a new account
pub async fn register(
    State(state): State<ServerState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let user = state.accounts.register(&req)?;
    Ok(ok_with_message(user, "User registered successfully"))
}

/// Logout: revoke the presented token
pub async fn logout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<()>>> {
    state.accounts.revoke(&user)?;
    Ok(Json(ApiResponse::ok()))
}

/// Current user
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    Ok(ok(state.accounts.get(user.id)?))
}
