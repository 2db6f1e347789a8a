//! 账号服务 - 注册、登录校验、令牌吊销

use crate::auth::CurrentUser;
use crate::db::Storage;
use crate::db::models::UserRecord;
use crate::db::repository::{
    CompanyRepository, ProjectRepository, RepoError, TokenRepository, UserRepository,
};
use crate::security_log;
use crate::utils::validation::{
    MAX_PASSWORD_LEN, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN, validate_length,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::client::{RegisterRequest, UserInfo};
use shared::models::Role;

const SUPER_ADMIN_FIRST_ONLY: &str =
    "Super admin accounts can only be created as the first account";

#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    tokens: TokenRepository,
    companies: CompanyRepository,
    projects: ProjectRepository,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(storage: Storage) -> Self {
        Self {
            users: UserRepository::new(storage.clone()),
            tokens: TokenRepository::new(storage.clone()),
            companies: CompanyRepository::new(storage.clone()),
            projects: ProjectRepository::new(storage),
        }
    }

    /// 注册新账号
    ///
    /// 超级管理员只能作为第一个账号注册，之后的超级管理员注册返回 403。
    pub fn register(&self, req: &RegisterRequest) -> AppResult<UserInfo> {
        let username = req.username.trim();
        validate_length(username, "username", MIN_USERNAME_LEN, MAX_USERNAME_LEN)?;
        validate_length(&req.password, "password", MIN_PASSWORD_LEN, MAX_PASSWORD_LEN)?;
        self.check_role(&req.role)?;

        let hash_pass = UserRecord::hash_password(&req.password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .users
            .create(username, hash_pass, req.role, req.role.is_super_admin())
            .map_err(|e| match e {
                RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::UsernameTaken, msg),
                RepoError::Forbidden(_) => {
                    security_log!("WARN", "super_admin_registration_denied", role = req.role.name());
                    AppError::forbidden(SUPER_ADMIN_FIRST_ONLY)
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user.info())
    }

    fn check_role(&self, role: &Role) -> AppResult<()> {
        match *role {
            Role::SuperAdmin => {
                if self.users.count()? > 0 {
                    security_log!("WARN", "super_admin_registration_denied", role = role.name());
                    return Err(AppError::forbidden(SUPER_ADMIN_FIRST_ONLY));
                }
            }
            Role::CompanyAdmin { company_id } => {
                if self.companies.find_by_id(company_id)?.is_none() {
                    return Err(AppError::with_message(
                        ErrorCode::CompanyNotFound,
                        format!("Company {} not found", company_id),
                    ));
                }
            }
            Role::ProjectLead { project_id } => {
                if self.projects.find_by_id(project_id)?.is_none() {
                    return Err(AppError::with_message(
                        ErrorCode::ProjectNotFound,
                        format!("Project {} not found", project_id),
                    ));
                }
            }
        }
        Ok(())
    }

    /// 校验用户名密码
    ///
    /// 用户不存在和密码错误返回同一个错误，防止用户名枚举。
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<UserInfo> {
        let Some(user) = self.users.find_by_username(username.trim())? else {
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        };

        let password_valid = user
            .verify_password(password)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
        if !password_valid {
            tracing::warn!(username = %username, "Login failed - invalid credentials");
            return Err(AppError::invalid_credentials());
        }

        Ok(user.info())
    }

    /// 账号信息
    pub fn get(&self, id: i64) -> AppResult<UserInfo> {
        self.users
            .find_by_id(id)?
            .map(|u| u.info())
            .ok_or_else(|| AppError::not_found(format!("User {}", id)))
    }

    /// 登出：吊销当前令牌
    pub fn revoke(&self, user: &CurrentUser) -> AppResult<()> {
        self.tokens.revoke(&user.jti, user.exp)?;
        tracing::info!(user_id = user.id, username = %user.username, "User logged out");
        Ok(())
    }

    pub fn is_revoked(&self, jti: &str) -> AppResult<bool> {
        Ok(self.tokens.is_revoked(jti)?)
    }

    /// 清理已过期的吊销记录
    pub fn purge_expired_tokens(&self) -> AppResult<usize> {
        Ok(self.tokens.purge_expired(chrono::Utc::now().timestamp())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DirectoryService;

    fn setup() -> AccountService {
        let storage = Storage::open_in_memory().unwrap();
        let directory = DirectoryService::new(storage.clone());
        let acme = directory.create_company("Acme").unwrap();
        directory.create_project(acme.id, "Falcon").unwrap();
        AccountService::new(storage)
    }

    fn request(username: &str, password: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    #[test]
    fn test_register_and_authenticate() {
        let svc = setup();
        let root = svc.register(&request("root", "rootpass", Role::SuperAdmin)).unwrap();
        assert_eq!(root.role, Role::SuperAdmin);

        let lead = svc
            .register(&request("lead", "leadpass", Role::ProjectLead { project_id: 1 }))
            .unwrap();
        assert_eq!(svc.authenticate("lead", "leadpass").unwrap(), lead);
        assert_eq!(svc.get(lead.id).unwrap(), lead);
    }

    #[test]
    fn test_bad_credentials_look_the_same() {
        let svc = setup();
        svc.register(&request("root", "rootpass", Role::SuperAdmin)).unwrap();

        let wrong_password = svc.authenticate("root", "nope").unwrap_err();
        let unknown_user = svc.authenticate("ghost", "rootpass").unwrap_err();
        assert_eq!(wrong_password.code, ErrorCode::InvalidCredentials);
        assert_eq!(wrong_password.code, unknown_user.code);
        assert_eq!(wrong_password.message, unknown_user.message);
    }

    #[test]
    fn test_registration_rules() {
        let svc = setup();
        let admin = Role::CompanyAdmin { company_id: 1 };

        assert_eq!(
            svc.register(&request("ab", "password", admin)).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            svc.register(&request("alice", "12345", admin)).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            svc.register(&request("alice", "password", Role::CompanyAdmin { company_id: 9 }))
                .unwrap_err()
                .code,
            ErrorCode::CompanyNotFound
        );
        assert_eq!(
            svc.register(&request("alice", "password", Role::ProjectLead { project_id: 9 }))
                .unwrap_err()
                .code,
            ErrorCode::ProjectNotFound
        );

        svc.register(&request("alice", "password", admin)).unwrap();
        assert_eq!(
            svc.register(&request("alice", "password", admin)).unwrap_err().code,
            ErrorCode::UsernameTaken
        );
        assert_eq!(
            svc.register(&request("mallory", "password", Role::SuperAdmin))
                .unwrap_err()
                .code,
            ErrorCode::PermissionDenied
        );
    }

    #[test]
    fn test_concurrent_first_registrations_yield_one_super_admin() {
        let svc = setup();
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));

        let handles: Vec<_> = ["root", "admin"]
            .into_iter()
            .map(|name| {
                let svc = svc.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    svc.register(&request(name, "rootpass", Role::SuperAdmin))
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let denied = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(denied.code, ErrorCode::PermissionDenied);
        assert_eq!(svc.users.count().unwrap(), 1);
    }

    #[test]
    fn test_revocation() {
        let svc = setup();
        let user = CurrentUser {
            id: 1,
            username: "root".into(),
            role: Role::SuperAdmin,
            jti: "token-1".into(),
            exp: chrono::Utc::now().timestamp() + 3600,
        };
        assert!(!svc.is_revoked("token-1").unwrap());
        svc.revoke(&user).unwrap();
        assert!(svc.is_revoked("token-1").unwrap());
        assert_eq!(svc.purge_expired_tokens().unwrap(), 0);
    }
}
