//! HTTP transports
//!
//! [`HttpClient`] is the seam between the typed API and the wire. Every call
//! takes the bearer token explicitly; the transports hold no session state.
//!
//! - [`NetworkHttpClient`] - reqwest over the network
//! - [`OneshotHttpClient`] - drives an axum `Router` in-process (feature `in-process`)

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;

use crate::ClientResult;

mod network;
#[cfg(feature = "in-process")]
mod oneshot;

pub use network::NetworkHttpClient;
#[cfg(feature = "in-process")]
pub use oneshot::OneshotHttpClient;

/// HTTP 客户端 trait
///
/// Implementations decode the shared envelope and map failures to
/// [`ClientError`](crate::ClientError). A 401 surfaces as
/// `ClientError::Unauthorized`; turning it into a cleared session is the
/// session guard's job.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>>;

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>>;

    async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>>;

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>>;

    async fn put_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>>;
}

pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
