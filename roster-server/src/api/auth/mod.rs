//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login, /api/auth/register: public (skipped by require_auth)
/// - /api/auth/logout, /api/users/me: bearer token (global require_auth middleware)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/logout", post(handler::logout))
        .route("/api/users/me", get(handler::me))
}
