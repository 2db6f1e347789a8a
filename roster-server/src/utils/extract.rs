//! 请求提取器
//!
//! 包装 axum 的 `Json` / `Path`，把反序列化失败转成统一的 [`AppError`]
//! 响应信封，而不是 axum 默认的纯文本。

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::utils::{AppError, ErrorCode};

/// JSON 请求体
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// 路径参数
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    let code = match rejection {
        JsonRejection::JsonDataError(_) => ErrorCode::ValidationFailed,
        _ => ErrorCode::InvalidFormat,
    };
    AppError::with_message(code, message)
}

fn path_rejection(rejection: PathRejection) -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text())
}
