//! Session store
//!
//! Holds zero or one bearer credential for the current user. Every change is
//! mirrored synchronously to durable storage (key `token`) and to a
//! path-scoped `token` cookie so server-rendered requests can see it, then
//! broadcast to subscribers. There is no client-side expiry: a credential is
//! valid until the backend rejects it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::observable::{Observable, Subscription};
use crate::storage::{cookie_value, CookieMirror, KeyValueStorage, MemoryStorage};

/// Storage key and cookie name of the credential
pub const TOKEN_KEY: &str = "token";

const EXPIRED_COOKIE_DATE: &str = "Thu, 01 Jan 1970 00:00:01 GMT";

/// Opaque bearer token identifying an authenticated session
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Extract the credential from a `Cookie` request header
pub fn credential_from_cookie_header(header: &str) -> Option<Credential> {
    cookie_value(header, TOKEN_KEY).map(Credential::from)
}

/// Shared, cloneable handle to the session credential
#[derive(Clone)]
pub struct Session {
    value: Observable<Option<Credential>>,
    storage: Arc<dyn KeyValueStorage>,
    cookies: Option<Arc<dyn CookieMirror>>,
}

impl Session {
    /// Load the session from storage so a restart does not force a new login
    pub fn load(storage: Arc<dyn KeyValueStorage>, cookies: Option<Arc<dyn CookieMirror>>) -> Self {
        let stored = match storage.get(TOKEN_KEY) {
            Ok(value) => value.filter(|token| !token.is_empty()).map(Credential::from),
            Err(e) => {
                warn!("Failed to read stored credential: {}", e);
                None
            }
        };

        Self {
            value: Observable::new(stored),
            storage,
            cookies,
        }
    }

    /// Session that persists nothing beyond the process
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()), None)
    }

    /// In-memory session that starts with the given credential
    pub fn with_credential(credential: Credential) -> Self {
        let session = Self::in_memory();
        session.set(Some(credential));
        session
    }

    /// Current credential, if any
    pub fn get(&self) -> Option<Credential> {
        self.value.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Replace the credential, mirror it to storage and cookie, then notify
    pub fn set(&self, credential: Option<Credential>) {
        self.mirror(credential.as_ref());
        match &credential {
            Some(_) => info!("Session credential set"),
            None => info!("Session credential cleared"),
        }
        self.value.set(credential);
    }

    /// Drop the credential
    pub fn clear(&self) {
        self.set(None);
    }

    /// Observe the credential; the callback runs now and on every change
    pub fn subscribe(
        &self,
        callback: impl Fn(Option<&Credential>) + Send + Sync + 'static,
    ) -> Subscription {
        self.value.subscribe(move |value| callback(value.as_ref()))
    }

    fn mirror(&self, credential: Option<&Credential>) {
        let stored = match credential {
            Some(credential) => self.storage.set(TOKEN_KEY, credential.as_str()),
            None => self.storage.remove(TOKEN_KEY),
        };
        if let Err(e) = stored {
            warn!("Failed to persist session credential: {}", e);
        }

        if let Some(cookies) = &self.cookies {
            let line = match credential {
                Some(credential) => format!("{}={}; path=/", TOKEN_KEY, credential.as_str()),
                None => format!("{}=; path=/; expires={};", TOKEN_KEY, EXPIRED_COOKIE_DATE),
            };
            cookies.write(&line);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
