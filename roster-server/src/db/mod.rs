//! 数据库模块
//!
//! redb 嵌入式存储 + 各实体仓库
//!
//! - [`storage`] - 表定义、事务辅助函数
//! - [`models`] - 仅服务端使用的存储模型 (账号)
//! - [`repository`] - 各实体的读写操作

pub mod models;
pub mod repository;
pub mod storage;

pub use storage::{Storage, StorageError, StorageResult};

use std::path::Path;

/// 数据库文件名
pub const DB_FILE: &str = "roster.redb";

/// 打开工作目录下的数据库
pub fn open_in_dir(work_dir: impl AsRef<Path>) -> StorageResult<Storage> {
    let path = work_dir.as_ref().join(DB_FILE);
    let storage = Storage::open(&path)?;
    tracing::info!(path = %path.display(), "Database opened");
    Ok(storage)
}
