//! Application state

use std::sync::Arc;

use reqwest::Client;

use crate::config::GoogleOAuthConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    google: GoogleOAuthConfig,
    http: Client,
}

impl AppState {
    pub fn new(google: GoogleOAuthConfig) -> Self {
        Self::with_http_client(google, Client::new())
    }

    pub fn with_http_client(google: GoogleOAuthConfig, http: Client) -> Self {
        Self {
            inner: Arc::new(AppStateInner { google, http }),
        }
    }

    pub fn google(&self) -> &GoogleOAuthConfig {
        &self.inner.google
    }

    /// Client for outbound calls to the identity provider
    pub fn http(&self) -> &Client {
        &self.inner.http
    }
}
