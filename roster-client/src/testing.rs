//! Scripted transport for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::ApiResponse;

use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

/// One recorded request
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

type Reply = Result<Value, ClientError>;

/// Replies are queued per route; the last one repeats
#[derive(Debug, Default)]
pub struct MockHttpClient {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: Method, path: &str, data: impl Serialize) {
        let value = serde_json::to_value(data).unwrap();
        self.push(method, path, Ok(value));
    }

    pub fn fail(&self, method: Method, path: &str, err: ClientError) {
        self.push(method, path, Err(err));
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> ClientResult<ApiResponse<T>> {
        self.calls.lock().unwrap().push(Call {
            method: method.clone(),
            path: path.to_string(),
            token: token.map(str::to_string),
            body,
        });

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&(method.clone(), path.to_string()))
            .unwrap_or_else(|| panic!("unexpected request {} {}", method, path));
        let reply = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };

        let data = reply?;
        Ok(ApiResponse::success(serde_json::from_value(data)?))
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.dispatch(Method::GET, path, token, None)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        self.dispatch(Method::POST, path, token, serde_json::to_value(body).ok())
    }

    async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.dispatch(Method::POST, path, token, None)
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<ApiResponse<T>> {
        self.dispatch(Method::PUT, path, token, serde_json::to_value(body).ok())
    }

    async fn put_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> ClientResult<ApiResponse<T>> {
        self.dispatch(Method::PUT, path, token, None)
    }
}
