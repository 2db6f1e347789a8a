//! Roster Client - typed client for the roster server
//!
//! - [`RosterClient`] - REST API with the session guard built in
//! - [`SessionContext`] - current session, observable through a watch channel
//! - [`flows`] - roster list, change submission forms, review flow
//! - [`http`] - network and in-process transports

pub mod api;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::RosterClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use http::OneshotHttpClient;
pub use session::{AuthState, Session, SessionContext};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, OnboardResponse, RegisterRequest, UserInfo};
