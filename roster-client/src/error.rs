//! Client error types
//!
//! Server failures arrive as the shared envelope `{code, message, details}`.
//! They are mapped onto a small set of outcomes a caller can branch on; the
//! session-invalidated outcome is kept apart from ordinary validation errors.

use http::StatusCode;
use serde_json::Value;
use shared::{ApiResponse, ErrorCategory, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Input rejected (client-side form check or server 400)
    #[error("Validation error: {message}")]
    Validation {
        code: Option<ErrorCode>,
        message: String,
    },

    /// Target is already in a conflicting state (409)
    #[error("Conflict: {message}")]
    Conflict { code: ErrorCode, message: String },

    /// Target does not exist (404)
    #[error("Not found: {message}")]
    NotFound { code: ErrorCode, message: String },

    /// Credentials or token rejected (401)
    ///
    /// Surfaces only from unauthenticated calls such as login; the session
    /// guard turns it into [`ClientError::SessionInvalidated`] everywhere else.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The session was cleared; the user has to log in again
    #[error("Session invalidated")]
    SessionInvalidated,

    /// Caller lacks the role or scope (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Transport failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Server-side failure (5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Client-side validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: None,
            message: message.into(),
        }
    }

    /// Map a failed envelope and its HTTP status to a client error
    pub fn from_envelope(status: StatusCode, body: ApiResponse<Value>) -> Self {
        let code = body.error_code();
        let message = body.message;

        if let Some(code) = code {
            return match code.category() {
                ErrorCategory::Auth if status == StatusCode::UNAUTHORIZED => {
                    Self::Unauthorized(message)
                }
                ErrorCategory::Permission => Self::Forbidden(message),
                ErrorCategory::System => Self::Server(message),
                _ => match code.http_status() {
                    StatusCode::NOT_FOUND => Self::NotFound { code, message },
                    StatusCode::CONFLICT => Self::Conflict { code, message },
                    _ => Self::Validation {
                        code: Some(code),
                        message,
                    },
                },
            };
        }

        Self::from_status(status, message)
    }

    /// Fallback when the body is not an envelope
    pub fn from_status(status: StatusCode, text: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(text),
            StatusCode::FORBIDDEN => Self::Forbidden(text),
            StatusCode::NOT_FOUND => Self::NotFound {
                code: ErrorCode::NotFound,
                message: text,
            },
            StatusCode::CONFLICT => Self::Conflict {
                code: ErrorCode::AlreadyExists,
                message: text,
            },
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Network(text),
            s if s.is_client_error() => Self::Validation {
                code: None,
                message: text,
            },
            _ => Self::Server(text),
        }
    }

    /// Error code reported by the server, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Conflict { code, .. } | Self::NotFound { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the user must log in again
    pub fn is_session_invalidated(&self) -> bool {
        matches!(self, Self::SessionInvalidated)
    }

    /// Text for a transient notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. }
            | Self::Conflict { message, .. }
            | Self::NotFound { message, .. } => message.clone(),
            Self::Unauthorized(message) | Self::Forbidden(message) => message.clone(),
            Self::SessionInvalidated => "Your session has ended. Please log in again.".to_string(),
            Self::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Server(_) | Self::InvalidResponse(_) => {
                "The server could not complete the request. Please try again later.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Decode a response body into the envelope's data
///
/// Shared by the network and in-process transports.
pub(crate) fn decode_response<T: serde::de::DeserializeOwned>(
    status: StatusCode,
    bytes: &[u8],
) -> ClientResult<ApiResponse<T>> {
    if !status.is_success() {
        return Err(match serde_json::from_slice::<ApiResponse<Value>>(bytes) {
            Ok(envelope) => ClientError::from_envelope(status, envelope),
            Err(_) => {
                ClientError::from_status(status, String::from_utf8_lossy(bytes).into_owned())
            }
        });
    }

    let envelope: ApiResponse<T> = serde_json::from_slice(bytes)?;
    if !envelope.is_success() {
        // 2xx carrying an error code
        let failed = ApiResponse::<Value> {
            code: envelope.code,
            message: envelope.message,
            data: None,
            details: envelope.details,
        };
        return Err(ClientError::from_envelope(status, failed));
    }
    Ok(envelope)
}
