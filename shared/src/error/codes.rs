//! Unified error codes for the roster services
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Directory errors (companies, projects)
//! - 4xxx: Employee errors
//! - 5xxx: Pending change errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values on the wire so that the
/// server, the Rust client and any browser front end agree on one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid or revoked
    TokenInvalid = 1004,
    /// Username is already registered
    UsernameTaken = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Target lies outside the caller's company/project scope
    OutOfScope = 2002,
    /// Super administrator role required
    SuperAdminRequired = 2003,

    // ==================== 3xxx: Directory ====================
    /// Company not found
    CompanyNotFound = 3001,
    /// Project not found
    ProjectNotFound = 3002,
    /// Project does not belong to the selected company
    ProjectCompanyMismatch = 3003,
    /// Company name already exists
    CompanyNameExists = 3004,
    /// Project name already exists
    ProjectNameExists = 3005,

    // ==================== 4xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 4001,
    /// Employee has left or was never onboarded
    EmployeeInactive = 4002,
    /// Employee already has an unresolved change
    EmployeeHasPendingChange = 4003,

    // ==================== 5xxx: Pending change ====================
    /// Pending change not found
    ChangeNotFound = 5001,
    /// Change was already approved or rejected
    ChangeAlreadyResolved = 5002,
    /// Transfer destination equals the current assignment
    DestinationUnchanged = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Network error
    NetworkError = 9004,
    /// Timeout error
    TimeoutError = 9005,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::UsernameTaken => "Username is already taken",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::OutOfScope => "Target is outside your scope",
            ErrorCode::SuperAdminRequired => "Super administrator role is required",

            // Directory
            ErrorCode::CompanyNotFound => "Company not found",
            ErrorCode::ProjectNotFound => "Project not found",
            ErrorCode::ProjectCompanyMismatch => "Project does not belong to the selected company",
            ErrorCode::CompanyNameExists => "Company name already exists",
            ErrorCode::ProjectNameExists => "Project name already exists",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeInactive => "Employee is no longer active",
            ErrorCode::EmployeeHasPendingChange => "Employee already has a pending change",

            // Pending change
            ErrorCode::ChangeNotFound => "Pending change not found",
            ErrorCode::ChangeAlreadyResolved => "Change has already been resolved",
            ErrorCode::DestinationUnchanged => "Destination equals the current assignment",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::UsernameTaken),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::OutOfScope),
            2003 => Ok(ErrorCode::SuperAdminRequired),

            // Directory
            3001 => Ok(ErrorCode::CompanyNotFound),
            3002 => Ok(ErrorCode::ProjectNotFound),
            3003 => Ok(ErrorCode::ProjectCompanyMismatch),
            3004 => Ok(ErrorCode::CompanyNameExists),
            3005 => Ok(ErrorCode::ProjectNameExists),

            // Employee
            4001 => Ok(ErrorCode::EmployeeNotFound),
            4002 => Ok(ErrorCode::EmployeeInactive),
            4003 => Ok(ErrorCode::EmployeeHasPendingChange),

            // Pending change
            5001 => Ok(ErrorCode::ChangeNotFound),
            5002 => Ok(ErrorCode::ChangeAlreadyResolved),
            5003 => Ok(ErrorCode::DestinationUnchanged),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
