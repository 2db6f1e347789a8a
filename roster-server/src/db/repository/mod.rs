//! Repository Module
//!
//! Read/write operations over the redb tables. Multi-record lifecycle
//! transitions live in `services::lifecycle`, which works on the same
//! transaction helpers.

pub mod change;
pub mod company;
pub mod employee;
pub mod project;
pub mod token;
pub mod user;

// Re-exports
pub use change::ChangeRepository;
pub use company::CompanyRepository;
pub use employee::EmployeeRepository;
pub use project::ProjectRepository;
pub use token::TokenRepository;
pub use user::UserRepository;

use crate::db::StorageError;
use shared::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl From<StorageError> for RepoError {
    fn from(err: StorageError) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Forbidden(msg) => AppError::forbidden(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Current time in unix milliseconds
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
