//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 (含数据库读检查) | 无 |

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};
use shared::client::HealthResponse;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<HealthResponse>>> {
    // 读一次目录，确认数据库可用
    state.directory.list_companies()?;

    Ok(ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
