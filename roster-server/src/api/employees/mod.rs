//! Employee API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Employee router
///
/// | 路径 | 方法 | 说明 |
/// |------|------|------|
/// | /api/active-employees | GET | 在岗/待定员工 (按角色过滤) |
/// | /api/employees | POST | 新员工入职 (创建入职申请) |
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/active-employees", get(handler::list_active))
        .route("/api/employees", post(handler::onboard))
}
