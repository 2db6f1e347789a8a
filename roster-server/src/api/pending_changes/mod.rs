//! Pending Change API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/pending-changes | GET | 未处理的变动申请 (按角色过滤) |
//! | /api/pending-changes/{employee_id}/transfer | PUT | 提交调岗申请 |
//! | /api/pending-changes/{employee_id}/resign | PUT | 提交离职申请 |
//! | /api/pending-changes/{change_id}/approve | PUT | 批准 |
//! | /api/pending-changes/{change_id}/reject | PUT | 驳回 |
//!
//! 注意：transfer/resign 的路径参数是员工 ID，approve/reject 的是申请 ID。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pending-changes", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/transfer", put(handler::transfer))
        .route("/{id}/resign", put(handler::resign))
        .route("/{id}/approve", put(handler::approve))
        .route("/{id}/reject", put(handler::reject))
}
