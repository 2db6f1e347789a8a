// Oneshot HTTP 客户端 - 内存通信
//
// 需要启用 "in-process" feature

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use tower::ServiceExt;

use super::{HttpClient, bearer};
use crate::error::decode_response;
use crate::{ClientError, ClientResult};

/// Oneshot HTTP 客户端 (内存调用)
///
/// 使用 Tower Service 的 oneshot 模式直接调用 Router，
/// 适用于同进程的服务器-客户端通信 (集成测试、嵌入式部署)。
///
/// # Example
///
/// ```ignore
/// let router: Router = build_app(&state).with_state(state);
/// let client = OneshotHttpClient::new(router);
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
}

impl OneshotHttpClient {
    /// `router` 必须已调用 `with_state`
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    fn build_request(
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, bearer(token));
        }
        let body = match body {
            Some(bytes) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(bytes)
            }
            None => Body::empty(),
        };
        builder
            .body(body)
            .map_err(|e| ClientError::Network(format!("Failed to build request: {}", e)))
    }

    /// 执行请求并处理响应
    async fn execute<T: DeserializeOwned>(
        &self,
        request: Request<Body>,
    ) -> ClientResult<ApiResponse<T>> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Network(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read body: {}", e)))?;

        decode_response(status, &bytes)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> ClientResult<ApiResponse<T>> {
        let request = Self::build_request(method, path, token, body)?;
        self.execute(request).await
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.call(Method::GET, path, token, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let bytes = serde_json::to_vec(body)?;
        self.call(Method::POST, path, token, Some(bytes)).await
    }

    async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.call(Method::POST, path, token, None).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let bytes = serde_json::to_vec(body)?;
        self.call(Method::PUT, path, token, Some(bytes)).await
    }

    async fn put_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.call(Method::PUT, path, token, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[tokio::test]
    async fn test_roundtrip_through_router() {
        let router = Router::new().route(
            "/ping",
            get(|| async { axum::Json(ApiResponse::success("pong".to_string())) }),
        );
        let client = OneshotHttpClient::new(router);

        let envelope: ApiResponse<String> = client.get("/ping", None).await.unwrap();
        assert_eq!(envelope.data.as_deref(), Some("pong"));

        let err = client.get::<String>("/missing", None).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }
}
