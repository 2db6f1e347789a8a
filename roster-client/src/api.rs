//! Typed client for the roster REST API
//!
//! [`RosterClient`] is also the session guard: every authenticated call reads
//! the bearer token from the [`SessionContext`], and a 401 from any of them
//! clears the session, publishes [`AuthState::LoginRequired`] and returns
//! [`ClientError::SessionInvalidated`].
//!
//! [`AuthState::LoginRequired`]: crate::AuthState::LoginRequired

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::client::{
    HealthResponse, LoginRequest, LoginResponse, OnboardResponse, RegisterRequest, UserInfo,
};
use shared::models::{
    ChangeId, Company, CompanyCreate, CompanyId, Employee, EmployeeCreate, EmployeeId,
    PendingChange, Project, ProjectCreate, ResignRequest, TransferRequest,
};

use crate::http::{HttpClient, NetworkHttpClient};
use crate::session::{Session, SessionContext};
use crate::{ClientConfig, ClientError, ClientResult};

/// Roster API client
#[derive(Debug, Clone)]
pub struct RosterClient<C> {
    http: C,
    session: Arc<SessionContext>,
}

impl RosterClient<NetworkHttpClient> {
    /// Network client with a fresh session
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(
            NetworkHttpClient::new(config)?,
            Arc::new(SessionContext::new()),
        ))
    }
}

impl<C: HttpClient> RosterClient<C> {
    pub fn new(http: C, session: Arc<SessionContext>) -> Self {
        Self { http, session }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Underlying transport
    pub fn http(&self) -> &C {
        &self.http
    }

    /// Run an authenticated call under the session guard
    async fn guarded<T, F, Fut>(&self, call: F) -> ClientResult<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let Some(token) = self.session.token() else {
            self.session.invalidate(None);
            return Err(ClientError::SessionInvalidated);
        };

        match call(token.clone()).await {
            Err(ClientError::Unauthorized(message)) => {
                tracing::warn!(%message, "Request rejected as unauthorized");
                self.session.invalidate(Some(&token));
                Err(ClientError::SessionInvalidated)
            }
            other => other,
        }
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let envelope = self
            .guarded(|token| async move { self.http.get::<T>(path, Some(&token)).await })
            .await?;
        into_data(envelope)
    }

    // ========== Auth API ==========

    /// Log in and start a session
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserInfo> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let envelope: ApiResponse<LoginResponse> =
            self.http.post("/api/auth/login", None, &request).await?;
        let LoginResponse { token, user } = into_data(envelope)?;

        self.session.sign_in(Session {
            token,
            user: user.clone(),
        });
        Ok(user)
    }

    /// Create an account; does not log in
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<UserInfo> {
        let envelope = self.http.post("/api/auth/register", None, request).await?;
        into_data(envelope)
    }

    /// Revoke the token and end the session
    ///
    /// The local session is cleared even when the server call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let Some(token) = self.session.token() else {
            return Ok(());
        };
        let result = self
            .http
            .post_empty::<()>("/api/auth/logout", Some(&token))
            .await;
        self.session.sign_out();

        match result {
            Ok(_) | Err(ClientError::Unauthorized(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Current user as the server sees it
    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.get_data("/api/users/me").await
    }

    // ========== Roster API ==========

    /// Employees on the roster within the caller's scope
    pub async fn list_active_employees(&self) -> ClientResult<Vec<Employee>> {
        self.get_data("/api/active-employees").await
    }

    /// Unresolved changes within the caller's scope
    pub async fn list_pending_changes(&self) -> ClientResult<Vec<PendingChange>> {
        self.get_data("/api/pending-changes").await
    }

    /// Add an employee; opens an onboarding change
    pub async fn onboard(&self, payload: &EmployeeCreate) -> ClientResult<OnboardResponse> {
        let envelope = self
            .guarded(|token| async move {
                self.http
                    .post::<OnboardResponse, _>("/api/employees", Some(&token), payload)
                    .await
            })
            .await?;
        into_data(envelope)
    }

    pub async fn submit_transfer(
        &self,
        employee_id: EmployeeId,
        payload: &TransferRequest,
    ) -> ClientResult<PendingChange> {
        let path = format!("/api/pending-changes/{}/transfer", employee_id);
        self.put_change(&path, payload).await
    }

    pub async fn submit_resign(
        &self,
        employee_id: EmployeeId,
        payload: &ResignRequest,
    ) -> ClientResult<PendingChange> {
        let path = format!("/api/pending-changes/{}/resign", employee_id);
        self.put_change(&path, payload).await
    }

    pub async fn approve(&self, change_id: ChangeId) -> ClientResult<PendingChange> {
        self.decide(change_id, "approve").await
    }

    pub async fn reject(&self, change_id: ChangeId) -> ClientResult<PendingChange> {
        self.decide(change_id, "reject").await
    }

    async fn put_change<B>(&self, path: &str, payload: &B) -> ClientResult<PendingChange>
    where
        B: serde::Serialize + Sync,
    {
        let envelope = self
            .guarded(|token| async move {
                self.http
                    .put::<PendingChange, _>(path, Some(&token), payload)
                    .await
            })
            .await?;
        into_data(envelope)
    }

    async fn decide(&self, change_id: ChangeId, action: &str) -> ClientResult<PendingChange> {
        let path = format!("/api/pending-changes/{}/{}", change_id, action);
        let envelope = self
            .guarded(|token| {
                let path = &path;
                async move {
                    self.http
                        .put_empty::<PendingChange>(path, Some(&token))
                        .await
                }
            })
            .await?;
        into_data(envelope)
    }

    // ========== Directory API ==========

    /// All companies (no login needed; the registration page uses it)
    pub async fn list_companies(&self) -> ClientResult<Vec<Company>> {
        let envelope = self.http.get("/api/companies", None).await?;
        into_data(envelope)
    }

    pub async fn list_projects(&self, company_id: CompanyId) -> ClientResult<Vec<Project>> {
        self.get_data(&format!("/api/companies/{}/projects", company_id))
            .await
    }

    /// Super admin only
    pub async fn create_company(&self, name: &str) -> ClientResult<Company> {
        let payload = CompanyCreate {
            name: name.to_string(),
        };
        let envelope = self
            .guarded(|token| {
                let payload = &payload;
                async move {
                    self.http
                        .post::<Company, _>("/api/companies", Some(&token), payload)
                        .await
                }
            })
            .await?;
        into_data(envelope)
    }

    /// Super admin only
    pub async fn create_project(&self, company_id: CompanyId, name: &str) -> ClientResult<Project> {
        let path = format!("/api/companies/{}/projects", company_id);
        let payload = ProjectCreate {
            name: name.to_string(),
        };
        let envelope = self
            .guarded(|token| {
                let (path, payload) = (&path, &payload);
                async move {
                    self.http
                        .post::<Project, _>(path, Some(&token), payload)
                        .await
                }
            })
            .await?;
        into_data(envelope)
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let envelope = self.http.get("/health", None).await?;
        into_data(envelope)
    }
}

fn into_data<T>(envelope: ApiResponse<T>) -> ClientResult<T> {
    envelope
        .data
        .ok_or_else(|| ClientError::InvalidResponse(format!("Missing data: {}", envelope.message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHttpClient;
    use crate::AuthState;
    use http::Method;
    use shared::models::Role;

    fn user() -> UserInfo {
        UserInfo {
            id: 7,
            username: "hr-acme".into(),
            role: Role::CompanyAdmin { company_id: 1 },
        }
    }

    fn client(mock: MockHttpClient) -> RosterClient<MockHttpClient> {
        RosterClient::new(mock, Arc::new(SessionContext::new()))
    }

    #[tokio::test]
    async fn test_login_starts_session_and_attaches_token() {
        let mock = MockHttpClient::new();
        mock.reply(
            Method::POST,
            "/api/auth/login",
            LoginResponse {
                token: "tok-1".into(),
                user: user(),
            },
        );
        mock.reply(Method::GET, "/api/active-employees", Vec::<Employee>::new());
        let client = client(mock);

        let me = client.login("hr-acme", "secret1").await.unwrap();
        assert_eq!(me, user());
        assert!(client.list_active_employees().await.unwrap().is_empty());

        let calls = client.http.calls();
        assert_eq!(calls[0].token, None);
        assert_eq!(calls[1].token.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let mock = MockHttpClient::new();
        mock.fail(
            Method::GET,
            "/api/pending-changes",
            ClientError::Unauthorized("Token has expired".into()),
        );
        let client = client(mock);
        client.session.sign_in(Session {
            token: "old".into(),
            user: user(),
        });
        let mut rx = client.session.subscribe();

        let err = client.list_pending_changes().await.unwrap_err();
        assert!(err.is_session_invalidated());
        assert_eq!(*rx.borrow_and_update(), AuthState::LoginRequired);
        assert!(client.session.token().is_none());
    }

    #[tokio::test]
    async fn test_no_session_skips_network() {
        let client = client(MockHttpClient::new());
        let err = client.approve(3).await.unwrap_err();
        assert!(err.is_session_invalidated());
        assert!(client.http.calls().is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_session() {
        let mock = MockHttpClient::new();
        mock.fail(
            Method::PUT,
            "/api/pending-changes/4/transfer",
            ClientError::validation("Project does not belong to the selected company"),
        );
        let client = client(mock);
        client.session.sign_in(Session {
            token: "tok".into(),
            user: user(),
        });

        let payload = TransferRequest {
            new_company: 2,
            new_project: 9,
            effective_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        let err = client.submit_transfer(4, &payload).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(client.session.is_signed_in());
    }

    #[tokio::test]
    async fn test_login_failure_is_not_a_session_event() {
        let mock = MockHttpClient::new();
        mock.fail(
            Method::POST,
            "/api/auth/login",
            ClientError::Unauthorized("Invalid username or password".into()),
        );
        let client = client(mock);

        let err = client.login("x", "y").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert_eq!(client.session.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_on_error() {
        let mock = MockHttpClient::new();
        mock.fail(
            Method::POST,
            "/api/auth/logout",
            ClientError::Network("connection reset".into()),
        );
        let client = client(mock);
        client.session.sign_in(Session {
            token: "tok".into(),
            user: user(),
        });

        assert!(client.logout().await.is_err());
        assert_eq!(client.session.state(), AuthState::SignedOut);
    }
}
