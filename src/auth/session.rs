//! Session lifecycle management.
//!
//! The `SessionManager` owns the authenticated-session state machine: it
//! runs logins, persists the resulting credential pair, derives the claims
//! shown in the UI, and tells the UI where to navigate after a transition.
//! It is the single writer of session state; UI code only reads it.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{debug, info};

use crate::api::ApiClient;

use super::claims::{self, SessionClaims};
use super::store::TokenStore;

/// Route shown after login when no redirect target was recorded.
pub const DEFAULT_LANDING_ROUTE: &str = "/dashboard";

/// Route of the login page.
pub const LOGIN_ROUTE: &str = "/login";

/// A navigation side effect for the UI layer to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
}

impl Navigation {
    pub fn to(route: impl Into<String>) -> Self {
        Self { to: route.into() }
    }
}

/// The session as observable by UI code.
///
/// `is_authenticated` is exactly "access credential present"; claims are a
/// read-only projection of that credential.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub claims: Option<SessionClaims>,
}

/// Owner of the authenticated-session lifecycle.
pub struct SessionManager {
    api: ApiClient,
    store: Arc<TokenStore>,
    redirect_target: Mutex<Option<String>>,
}

impl SessionManager {
    pub fn new(api: ApiClient) -> Self {
        let store = Arc::clone(api.token_store());
        Self {
            api,
            store,
            redirect_target: Mutex::new(None),
        }
    }

    /// The API client this session authenticates. UI screens share it for
    /// their resource calls.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Current session state, derived from the stored credentials. Claims
    /// are recomputed from the access token on every read, so any change
    /// to the stored credential (login, refresh, logout) is reflected
    /// immediately.
    pub fn state(&self) -> SessionState {
        let access = self.store.load().access;
        SessionState {
            is_authenticated: access.is_some(),
            claims: access.as_deref().and_then(claims::decode),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.load().has_access()
    }

    /// Record where a denied navigation was headed, so a later login can
    /// resume there. Consumed by the next successful login.
    pub fn remember_redirect_target(&self, location: &str) {
        let mut target = self.redirect_target.lock().unwrap_or_else(|e| e.into_inner());
        *target = Some(location.to_string());
    }

    /// Authenticate and persist the returned credential pair. On success
    /// the UI should navigate to the returned target: the page the user was
    /// originally headed to, or the default landing page.
    pub async fn login(&self, username: &str, password: &str) -> Result<Navigation> {
        let pair = self.api.authenticate(username, password).await?;
        self.store.save(&pair)?;
        info!("Logged in");

        let target = self
            .redirect_target
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .unwrap_or_else(|| DEFAULT_LANDING_ROUTE.to_string());
        debug!(destination = %target, "Post-login navigation");
        Ok(Navigation::to(target))
    }

    /// End the session. Always succeeds, even when no session was active.
    pub fn logout(&self) -> Navigation {
        self.store.clear();
        info!("Logged out");
        Navigation::to(LOGIN_ROUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenPair;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn manager_for(server: &mockito::Server) -> (tempfile::TempDir, SessionManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TokenStore::new(dir.path().to_path_buf()));
        let api = ApiClient::new(server.url(), store).unwrap();
        (dir, SessionManager::new(api))
    }

    async fn login_mock(server: &mut mockito::Server, body: &str) -> mockito::Mock {
        server
            .mock("POST", "/auth/token/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_login_persists_tokens_and_lands_on_dashboard() {
        let mut server = mockito::Server::new_async().await;
        let _mock = login_mock(&mut server, r#"{"access":"A1","refresh":"R1"}"#).await;
        let (_dir, session) = manager_for(&server);

        assert!(!session.is_authenticated());

        let nav = session.login("bob", "hunter2").await.unwrap();
        assert_eq!(nav, Navigation::to(DEFAULT_LANDING_ROUTE));
        assert!(session.is_authenticated());

        let pair = session.api().token_store().load();
        assert_eq!(pair.access.as_deref(), Some("A1"));
        assert_eq!(pair.refresh.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_login_consumes_redirect_target_once() {
        let mut server = mockito::Server::new_async().await;
        let _mock = login_mock(&mut server, r#"{"access":"A1","refresh":"R1"}"#).await;
        let (_dir, session) = manager_for(&server);

        session.remember_redirect_target("/budgets");
        let nav = session.login("bob", "hunter2").await.unwrap();
        assert_eq!(nav, Navigation::to("/budgets"));

        // The target was consumed; a later login falls back to the default
        let nav = session.login("bob", "hunter2").await.unwrap();
        assert_eq!(nav, Navigation::to(DEFAULT_LANDING_ROUTE));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_anonymous() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/token/")
            .with_status(401)
            .with_body(r#"{"detail":"No active account found"}"#)
            .create_async()
            .await;
        let (_dir, session) = manager_for(&server);

        let err = session.login("bob", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "No active account found");
        assert!(!session.is_authenticated());
        assert_eq!(session.api().token_store().load(), TokenPair::default());
    }

    #[tokio::test]
    async fn test_state_derives_claims_from_stored_token() {
        let server = mockito::Server::new_async().await;
        let (_dir, session) = manager_for(&server);

        let payload = URL_SAFE_NO_PAD.encode(r#"{"username":"bob","exp":1700000000}"#);
        session
            .api()
            .token_store()
            .save(&TokenPair {
                access: Some(format!("h.{}.s", payload)),
                refresh: None,
            })
            .unwrap();

        let state = session.state();
        assert!(state.is_authenticated);
        let claims = state.claims.unwrap();
        assert_eq!(claims.display_name.as_deref(), Some("bob"));
        assert_eq!(claims.expiry, Some(1700000000));
    }

    #[tokio::test]
    async fn test_opaque_token_is_authenticated_without_claims() {
        let server = mockito::Server::new_async().await;
        let (_dir, session) = manager_for(&server);

        session
            .api()
            .token_store()
            .save(&TokenPair {
                access: Some("not-a-jwt".to_string()),
                refresh: None,
            })
            .unwrap();

        let state = session.state();
        assert!(state.is_authenticated);
        assert_eq!(state.claims, None);
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_is_idempotent() {
        let server = mockito::Server::new_async().await;
        let (_dir, session) = manager_for(&server);

        session
            .api()
            .token_store()
            .save(&TokenPair {
                access: Some("A1".to_string()),
                refresh: Some("R1".to_string()),
            })
            .unwrap();

        let nav = session.logout();
        assert_eq!(nav, Navigation::to(LOGIN_ROUTE));
        assert!(!session.is_authenticated());
        assert_eq!(session.state().claims, None);
        assert_eq!(session.api().token_store().load(), TokenPair::default());

        // Logging out with no active session also succeeds
        let nav = session.logout();
        assert_eq!(nav, Navigation::to(LOGIN_ROUTE));
    }
}
