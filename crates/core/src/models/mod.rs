//! DTOs mirrored from the backend REST API
//!
//! The backend is the sole authority for every entity; the console only
//! holds read copies and request bodies. Payloads whose shape the backend
//! does not pin down keep unknown fields in a flattened `extra` map.

mod agent;
mod auth;
mod organization;
mod project;
mod prompt;
mod rag;
mod statistics;
mod user_api_key;
mod vector_db;

pub use agent::*;
pub use auth::*;
pub use organization::*;
pub use project::*;
pub use prompt::*;
pub use rag::*;
pub use statistics::*;
pub use user_api_key::*;
pub use vector_db::*;

/// Free-form JSON object
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Error body returned by the backend on failure
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}
