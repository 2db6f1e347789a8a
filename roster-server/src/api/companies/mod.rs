//! Company / Project API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_super_admin;
use crate::core::ServerState;

/// Company router
///
/// | 路径 | 方法 | 认证 |
/// |------|------|------|
/// | /api/companies | GET | 无 (注册页使用) |
/// | /api/companies | POST | 超级管理员 |
/// | /api/companies/{id}/projects | GET | 登录 |
/// | /api/companies/{id}/projects | POST | 超级管理员 |
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/companies", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：公司列表公开，项目列表需登录 (require_auth 处理)
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/projects", get(handler::list_projects));

    // 管理路由：仅超级管理员
    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}/projects", axum::routing::post(handler::create_project))
        .layer(middleware::from_fn(require_super_admin));

    read_routes.merge(manage_routes)
}
