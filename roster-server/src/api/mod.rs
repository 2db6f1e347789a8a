//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、注册、登出、当前用户
//! - [`employees`] - 员工名册与入职
//! - [`pending_changes`] - 调岗/离职申请与审批
//! - [`companies`] - 公司与项目目录

use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

pub mod auth;
pub mod companies;
pub mod employees;
pub mod health;
pub mod logging;
pub mod pending_changes;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Auth API - login/register public, the rest authenticated
        .merge(auth::router())
        // Roster API - authentication required
        .merge(employees::router())
        .merge(pending_changes::router())
        // Directory API - list public, writes super admin only
        .merge(companies::router())
        // Health API - public route
        .merge(health::router())
}

/// Requests running longer than `timeout_ms` are answered with 408
pub fn request_timeout_layer(timeout_ms: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_millis(timeout_ms))
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and in-process calls
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(request_timeout_layer(state.config.request_timeout_ms))
        // Request logging
        .layer(axum_middleware::from_fn(logging::logging_middleware))
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        .layer(SetRequestIdLayer::new(request_id.clone(), XRequestId))
        .layer(PropagateRequestIdLayer::new(request_id))
        // JWT authentication - injects CurrentUser for protected routes
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
}
