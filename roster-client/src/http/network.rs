// 网络 HTTP 客户端

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;

use super::{HttpClient, bearer};
use crate::error::decode_response;
use crate::{ClientConfig, ClientResult};

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    /// Build a client; every request is bounded by `config.timeout`
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        if let Some(token) = token {
            request = request.header(reqwest::header::AUTHORIZATION, bearer(token));
        }
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        decode_response(status, &bytes)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.send(self.client.get(self.url(path)), token).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        self.send(self.client.post(self.url(path)).json(body), token)
            .await
    }

    async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.send(self.client.post(self.url(path)), token).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        self.send(self.client.put(self.url(path)).json(body), token)
            .await
    }

    async fn put_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.send(self.client.put(self.url(path)), token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = NetworkHttpClient::new(&ClientConfig::new("http://hr.local:5000/")).unwrap();
        assert_eq!(client.base_url(), "http://hr.local:5000");
        assert_eq!(
            client.url("/api/pending-changes"),
            "http://hr.local:5000/api/pending-changes"
        );
        assert_eq!(client.url("health"), "http://hr.local:5000/health");
    }
}
