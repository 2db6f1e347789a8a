//! Client-related types shared between server and client
//!
//! Request/response bodies used in API communication.
//! These types are shared between roster-server and roster-client.

use serde::{Deserialize, Serialize};

use crate::models::{Employee, PendingChange, Role};

// Re-export the envelope every endpoint answers with
pub use crate::error::ApiResponse;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// User information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

// =============================================================================
// Lifecycle API DTOs
// =============================================================================

/// Result of adding an employee: the new record and its onboarding change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardResponse {
    pub employee: Employee,
    pub change: PendingChange,
}

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
