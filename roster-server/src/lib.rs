//! Roster Server - 员工生命周期管理服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 redb 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系，按角色划分可见范围
//! - **业务服务** (`services`): 入职/调岗/离职申请与审批、公司项目目录、账号
//! - **HTTP API** (`api`): `/api` 下的 RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! roster-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、中间件、提取器
//! ├── services/      # 生命周期引擎、目录、账号
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、校验、提取器
//! └── db/            # redb 存储层与仓库
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use api::{build_app, build_router};
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerError, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env、读取配置、初始化日志
///
/// 日志写入 `{WORK_DIR}/logs`，目录创建失败时退回控制台输出。
pub fn setup_environment() -> core::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    let log_dir = config.log_dir();
    let log_dir = std::fs::create_dir_all(&log_dir).ok().map(|_| log_dir);

    init_logger_with_file(Some(&config.log_level), config.log_json, log_dir.as_deref());
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____            __
   / __ \____  ____/ /____  _____
  / /_/ / __ \/ ___/ __/ _ \/ ___/
 / _, _/ /_/ (__  ) /_/  __/ /
/_/ |_|\____/____/\__/\___/_/
    "#
    );
}
