//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;

use console_core::storage::{FileStorage, KeyValueStorage, MemoryStorage};

use crate::error::{ApiError, Result};

/// Public (client-safe) configuration
///
/// Never holds OAuth secrets; those live in the server configuration only.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend REST API base URL, e.g. `https://api.example.com`
    pub base_url: String,
    /// Where the session and theme entries are persisted, if anywhere
    pub storage_file: Option<PathBuf>,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            storage_file: None,
        }
    }

    pub fn with_storage_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_file = Some(path.into());
        self
    }

    /// Read `PUBLIC_API_URL` and `CONSOLE_STORAGE_FILE`
    pub fn from_env() -> Result<Self> {
        let base_url =
            env_value("PUBLIC_API_URL").ok_or(ApiError::MissingConfig("PUBLIC_API_URL"))?;
        Ok(Self {
            base_url,
            storage_file: env_value("CONSOLE_STORAGE_FILE").map(PathBuf::from),
        })
    }

    /// Storage backing the session and theme stores
    pub fn open_storage(&self) -> console_core::Result<Arc<dyn KeyValueStorage>> {
        let storage: Arc<dyn KeyValueStorage> = match &self.storage_file {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}
