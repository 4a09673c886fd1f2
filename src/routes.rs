//! Route-level access gating.
//!
//! A pure decision over the published session state: authenticated
//! navigation renders, anonymous navigation is redirected to the login
//! page with the originating location remembered for after login.

use crate::auth::{Navigation, SessionManager, LOGIN_ROUTE};

/// Decision for a navigation attempt into protected content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Render the protected content.
    Granted,
    /// Send the user to the login page instead.
    Redirect(Navigation),
}

/// Gate a protected route on the current session state. A denied attempt
/// records `location` so the next login can resume there.
pub fn guard_route(session: &SessionManager, location: &str) -> RouteAccess {
    if session.is_authenticated() {
        RouteAccess::Granted
    } else {
        session.remember_redirect_target(location);
        RouteAccess::Redirect(Navigation::to(LOGIN_ROUTE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::auth::{TokenPair, TokenStore, DEFAULT_LANDING_ROUTE};
    use std::sync::Arc;

    fn session_for(server: &mockito::Server) -> (tempfile::TempDir, SessionManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TokenStore::new(dir.path().to_path_buf()));
        let api = ApiClient::new(server.url(), store).unwrap();
        (dir, SessionManager::new(api))
    }

    #[tokio::test]
    async fn test_authenticated_navigation_is_granted() {
        let server = mockito::Server::new_async().await;
        let (_dir, session) = session_for(&server);
        session
            .api()
            .token_store()
            .save(&TokenPair {
                access: Some("A1".to_string()),
                refresh: None,
            })
            .unwrap();

        assert_eq!(guard_route(&session, "/expenses"), RouteAccess::Granted);
    }

    #[tokio::test]
    async fn test_anonymous_navigation_redirects_to_login() {
        let server = mockito::Server::new_async().await;
        let (_dir, session) = session_for(&server);

        assert_eq!(
            guard_route(&session, "/expenses"),
            RouteAccess::Redirect(Navigation::to(LOGIN_ROUTE))
        );
    }

    #[tokio::test]
    async fn test_denied_location_is_resumed_after_login() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/token/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access":"A1","refresh":"R1"}"#)
            .create_async()
            .await;
        let (_dir, session) = session_for(&server);

        guard_route(&session, "/reports");
        let nav = session.login("bob", "hunter2").await.unwrap();
        assert_eq!(nav, Navigation::to("/reports"));

        // Once authenticated the guard lets the original route through
        assert_eq!(guard_route(&session, "/reports"), RouteAccess::Granted);

        // A fresh login with no denied navigation lands on the default
        let nav = session.login("bob", "hunter2").await.unwrap();
        assert_eq!(nav, Navigation::to(DEFAULT_LANDING_ROUTE));
    }
}
