//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// 无需登录的 API 路由
fn is_public_api_route(method: &Method, path: &str) -> bool {
    match path {
        "/api/auth/login" | "/api/auth/register" => true,
        "/api/companies" => method == Method::GET,
        _ => false,
    }
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health` 等)
/// - `/api/auth/login`, `/api/auth/register`
/// - `GET /api/companies` (注册页需要公司列表)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 已登出 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_owned();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let user = authenticate(&state, token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.message.clone(),
            uri = format!("{:?}", req.uri())
        );
        e
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 校验令牌并检查是否已吊销
pub(crate) fn authenticate(state: &ServerState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state.get_jwt_service().validate_token(token).map_err(|e| match e {
        JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    })?;

    let user = CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;

    if state.accounts.is_revoked(&user.jti)? {
        return Err(AppError::invalid_token("Token has been revoked"));
    }
    Ok(user)
}

/// 超级管理员中间件 - 目录管理 (新建公司/项目)
///
/// # 错误
///
/// 非超级管理员返回 403 SuperAdminRequired
pub async fn require_super_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_super_admin() {
        security_log!(
            "WARN",
            "super_admin_required",
            user_id = user.id,
            username = user.username.clone(),
            user_role = user.role.name()
        );
        return Err(AppError::new(ErrorCode::SuperAdminRequired));
    }

    Ok(next.run(req).await)
}
