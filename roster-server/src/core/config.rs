use crate::auth::{JwtConfig, JwtError};
use std::path::PathBuf;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./roster-data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | AUTH_DELAY_MS | 500 | 登录固定延迟(毫秒)，防计时攻击 |
/// | SEED_FILE | - | 公司/项目种子 JSON |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | JWT_* | - | 见 [`JwtConfig::from_env`] |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/roster HTTP_PORT=8080 SEED_FILE=seed.json cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 登录固定延迟 (毫秒)
    pub auth_delay_ms: u64,
    /// 种子文件路径
    pub seed_file: Option<String>,
    /// 日志级别
    pub log_level: String,
    /// JSON 格式日志
    pub log_json: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值。生产环境未设置 JWT_SECRET 时返回错误。
    pub fn from_env() -> Result<Self, JwtError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "production")?;

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./roster-data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt,
            environment,
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            auth_delay_ms: std::env::var("AUTH_DELAY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(500),
            seed_file: std::env::var("SEED_FILE").ok().filter(|s| !s.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }

    /// 不读环境变量的配置 (测试、嵌入场景)
    pub fn new(work_dir: impl Into<String>, http_port: u16, jwt: JwtConfig) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port,
            jwt,
            environment: "development".into(),
            request_timeout_ms: 30000,
            auth_delay_ms: 500,
            seed_file: None,
            log_level: "info".into(),
            log_json: false,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 数据库文件所在目录
    pub fn work_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        self.work_dir_path().join("logs")
    }
}
