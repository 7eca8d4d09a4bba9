//! Auth boundary
//!
//! [`ApiClient::request`](crate::ApiClient::request) only classifies 401 and
//! 403 answers. The boundary is where that classification turns into effects:
//! an expired session is cleared and the user is sent to the login page, a
//! forbidden resource sends the user back to the application home.

use console_core::session::{Credential, Session};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};

/// Route shown when no valid session exists
pub const LOGIN_ROUTE: &str = "/login";

/// Route shown when an authenticated user is denied a resource
pub const APP_HOME_ROUTE: &str = "/app";

/// Something that can move the user to another page
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator that publishes the requested route to watchers
///
/// The UI shell subscribes and renders whatever route was requested last.
#[derive(Debug, Clone)]
pub struct RouteChannel {
    tx: watch::Sender<Option<String>>,
}

impl Default for RouteChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    /// Last requested route
    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }
}

impl Navigator for RouteChannel {
    fn navigate(&self, route: &str) {
        // Works without receivers; the value stays readable through `current`.
        self.tx.send_replace(Some(route.to_string()));
    }
}

/// Applies the 401/403 contract to API results
#[derive(Clone)]
pub struct AuthBoundary {
    session: Session,
    navigator: Arc<dyn Navigator>,
}

impl AuthBoundary {
    pub fn new(session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Pass a result through, reacting to authentication failures
    ///
    /// The error is returned unchanged so callers still see why the call
    /// failed.
    pub fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.handle(err);
        }
        result
    }

    /// React to a failed call: clear the session on 401, leave on 403
    pub fn handle(&self, err: &ApiError) {
        match err {
            ApiError::Unauthenticated => {
                info!("Session rejected by backend, returning to login");
                self.session.clear();
                self.navigator.navigate(LOGIN_ROUTE);
            }
            ApiError::Forbidden => {
                info!("Access denied, returning to application home");
                self.navigator.navigate(APP_HOME_ROUTE);
            }
            _ => {}
        }
    }

    /// Log in and store the credential in the session
    pub async fn sign_in(&self, client: &ApiClient, email: &str, password: &str) -> Result<Credential> {
        let credential = client.login(email, password).await?;
        self.session.set(Some(credential.clone()));
        Ok(credential)
    }

    /// Register and store the credential in the session
    pub async fn sign_up(
        &self,
        client: &ApiClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Credential> {
        let credential = client.register(name, email, password).await?;
        self.session.set(Some(credential.clone()));
        Ok(credential)
    }

    /// End the session and return to the login page
    ///
    /// Nothing is sent to the backend; clearing the credential also removes
    /// its cookie.
    pub fn logout(&self) {
        info!("Logging out");
        self.session.clear();
        self.navigator.navigate(LOGIN_ROUTE);
    }
}

impl std::fmt::Debug for AuthBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBoundary")
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn boundary_with_token() -> (AuthBoundary, RouteChannel) {
        let routes = RouteChannel::new();
        let session = Session::with_credential(Credential::new("T1"));
        (AuthBoundary::new(session, Arc::new(routes.clone())), routes)
    }

    #[test]
    fn test_unauthenticated_clears_session_and_goes_to_login() {
        let (boundary, routes) = boundary_with_token();

        let result: Result<()> = boundary.guard(Err(ApiError::Unauthenticated));
        assert!(matches!(result, Err(ApiError::Unauthenticated)));
        assert_eq!(boundary.session().get(), None);
        assert_eq!(routes.current().as_deref(), Some(LOGIN_ROUTE));
    }

    #[test]
    fn test_forbidden_keeps_session_and_goes_home() {
        let (boundary, routes) = boundary_with_token();

        boundary.handle(&ApiError::Forbidden);
        assert_eq!(boundary.session().get(), Some(Credential::new("T1")));
        assert_eq!(routes.current().as_deref(), Some(APP_HOME_ROUTE));
    }

    #[test]
    fn test_other_failures_have_no_effect() {
        let (boundary, routes) = boundary_with_token();

        let result: Result<u32> = boundary.guard(Err(ApiError::request_failed(
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom",
        )));
        assert!(result.is_err());
        assert!(boundary.session().is_authenticated());
        assert_eq!(routes.current(), None);

        assert_eq!(boundary.guard(Ok(7)).unwrap(), 7);
    }

    #[test]
    fn test_logout_clears_session_and_goes_to_login() {
        let (boundary, routes) = boundary_with_token();

        boundary.logout();
        assert_eq!(boundary.session().get(), None);
        assert_eq!(routes.current().as_deref(), Some(LOGIN_ROUTE));
    }

    #[tokio::test]
    async fn test_route_channel_notifies_watchers() {
        let routes = RouteChannel::new();
        let mut rx = routes.subscribe();

        routes.navigate(LOGIN_ROUTE);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_deref(), Some(LOGIN_ROUTE));
    }
}
