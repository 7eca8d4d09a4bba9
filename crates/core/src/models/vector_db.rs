//! Vector database connection profiles

use serde::{Deserialize, Serialize};

use super::JsonObject;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorDbConfig {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub is_default: bool,
    /// Provider-specific connection settings
    #[serde(flatten)]
    pub settings: JsonObject,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorDbConfigRequest {
    pub name: String,
    pub provider: String,
    #[serde(flatten)]
    pub settings: JsonObject,
}

/// Result of a connectivity check against a configured vector database
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnectionTest {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}
