use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::{self, Storage};
use crate::services::{AccountService, DirectoryService, LifecycleService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 内部共享句柄实现浅拷贝，每个请求克隆一份的成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | storage | Storage | redb 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | lifecycle | LifecycleService | 员工生命周期引擎 |
/// | directory | DirectoryService | 公司/项目目录 |
/// | accounts | AccountService | 账号与令牌 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (redb)
    pub storage: Storage,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 员工生命周期引擎
    pub lifecycle: LifecycleService,
    /// 公司/项目目录
    pub directory: DirectoryService,
    /// 账号服务
    pub accounts: AccountService,
}

impl ServerState {
    /// 基于已打开的存储创建状态
    pub fn new(config: Config, storage: Storage) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            lifecycle: LifecycleService::new(storage.clone()),
            directory: DirectoryService::new(storage.clone()),
            accounts: AccountService::new(storage.clone()),
            jwt_service,
            storage,
            config,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 打开数据库
    /// 3. 导入种子数据 (如配置了 SEED_FILE)
    /// 4. 清理过期的吊销记录
    pub fn initialize(config: &Config) -> Result<Self> {
        let work_dir = config.work_dir_path();
        std::fs::create_dir_all(&work_dir)?;

        let storage = db::open_in_dir(&work_dir)?;
        let state = Self::new(config.clone(), storage);
        state.prepare()?;
        Ok(state)
    }

    /// 内存数据库 (测试)
    pub fn in_memory(config: Config) -> Result<Self> {
        let state = Self::new(config, Storage::open_in_memory()?);
        state.prepare()?;
        Ok(state)
    }

    fn prepare(&self) -> Result<()> {
        if let Some(seed) = &self.config.seed_file {
            let report = self.directory.seed_from_file(Path::new(seed))?;
            tracing::info!(
                companies = report.companies,
                projects = report.projects,
                "Directory seed applied"
            );
        }

        let purged = self.accounts.purge_expired_tokens()?;
        if purged > 0 {
            tracing::debug!(purged, "Expired token revocations removed");
        }
        Ok(())
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        self.config.work_dir_path()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
