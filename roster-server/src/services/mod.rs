//! 服务层 - 业务逻辑
//!
//! # 服务列表
//!
//! - [`LifecycleService`] - 员工生命周期引擎 (入职/调岗/离职 申请与审批)
//! - [`DirectoryService`] - 公司与项目目录 (含种子导入)
//! - [`AccountService`] - 账号注册、登录校验、令牌吊销

pub mod accounts;
pub mod directory;
pub mod lifecycle;

pub use accounts::AccountService;
pub use directory::{DirectoryService, DirectorySeed, SeedReport};
pub use lifecycle::LifecycleService;
