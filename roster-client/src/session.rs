//! Session state
//!
//! A [`SessionContext`] owns the current [`Session`] and publishes every
//! transition on a `tokio::sync::watch` channel. A front end subscribes and
//! routes to its login screen when it sees [`AuthState::LoginRequired`].
//!
//! The context is passed explicitly (usually as `Arc<SessionContext>`);
//! there is no process-global session.

use shared::client::UserInfo;
use tokio::sync::watch;

/// Bearer token plus the user it was issued to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
}

/// Observable authentication state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No session yet, or the user logged out
    #[default]
    SignedOut,
    /// Logged in
    SignedIn(Session),
    /// The server rejected the session; redirect to login
    LoginRequired,
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

/// Holder of the current session
#[derive(Debug)]
pub struct SessionContext {
    state: watch::Sender<AuthState>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::SignedOut);
        Self { state }
    }

    /// Subscribe to state transitions
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().session().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.borrow().session().map(|s| s.user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.borrow().session().is_some()
    }

    pub(crate) fn sign_in(&self, session: Session) {
        tracing::info!(user = %session.user.username, "Signed in");
        self.state.send_replace(AuthState::SignedIn(session));
    }

    pub(crate) fn sign_out(&self) {
        self.state.send_replace(AuthState::SignedOut);
    }

    /// Clear the session a rejected `token` belongs to and ask for a login
    ///
    /// A newer session (signed in while the rejected request was in flight)
    /// is left alone.
    pub(crate) fn invalidate(&self, token: Option<&str>) {
        self.state.send_if_modified(|state| {
            let stale = match (state.session(), token) {
                (Some(current), Some(token)) => current.token == token,
                (Some(_), None) => false,
                (None, _) => !matches!(state, AuthState::LoginRequired),
            };
            if stale {
                tracing::warn!("Session invalidated, login required");
                *state = AuthState::LoginRequired;
            }
            stale
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            user: UserInfo {
                id: 1,
                username: "alice".into(),
                role: Role::SuperAdmin,
            },
        }
    }

    #[test]
    fn test_sign_in_and_out() {
        let ctx = SessionContext::new();
        assert_eq!(ctx.state(), AuthState::SignedOut);
        assert!(ctx.token().is_none());

        ctx.sign_in(session("t1"));
        assert!(ctx.is_signed_in());
        assert_eq!(ctx.token().as_deref(), Some("t1"));
        assert_eq!(ctx.user().unwrap().username, "alice");

        ctx.sign_out();
        assert_eq!(ctx.state(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_invalidate_publishes_login_required() {
        let ctx = SessionContext::new();
        let mut rx = ctx.subscribe();
        ctx.sign_in(session("t1"));
        rx.borrow_and_update();

        ctx.invalidate(Some("t1"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::LoginRequired);
        assert!(ctx.token().is_none());
    }

    #[test]
    fn test_invalidate_keeps_newer_session() {
        let ctx = SessionContext::new();
        ctx.sign_in(session("t2"));
        ctx.invalidate(Some("t1"));
        assert_eq!(ctx.token().as_deref(), Some("t2"));
    }

    #[test]
    fn test_invalidate_without_session() {
        let ctx = SessionContext::new();
        let rx = ctx.subscribe();
        ctx.invalidate(None);
        assert_eq!(ctx.state(), AuthState::LoginRequired);
        assert!(rx.has_changed().unwrap());
    }
}
