//! Shared types for the roster services
//!
//! Domain models, role scoping, error codes, the response envelope and the
//! request/response bodies used by both roster-server and roster-client.

pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
