//! Vector database configurations of an organization

use console_core::models::{ConnectionTest, JsonObject, VectorDbConfig, VectorDbConfigRequest};
use console_core::path::ApiPath;
use reqwest::Method;

use super::{org_path, read_json, ApiClient, Failure, RequestOptions};
use crate::error::Result;

fn configs_path(org_id: &str) -> ApiPath {
    org_path(org_id).segment("vector-db-configs")
}

impl ApiClient {
    pub async fn vector_db_configs(&self, org_id: &str) -> Result<Vec<VectorDbConfig>> {
        self.get_json(
            configs_path(org_id),
            Failure::Fixed("Failed to fetch vector database configurations"),
        )
        .await
    }

    pub async fn vector_db_config(&self, org_id: &str, config_id: &str) -> Result<VectorDbConfig> {
        self.get_json(
            configs_path(org_id).id(config_id),
            Failure::Fixed("Failed to fetch vector database configuration"),
        )
        .await
    }

    pub async fn create_vector_db_config(
        &self,
        org_id: &str,
        request: &VectorDbConfigRequest,
    ) -> Result<VectorDbConfig> {
        self.send_json(
            Method::POST,
            configs_path(org_id),
            request,
            Failure::ServerOr("Failed to create vector database configuration"),
        )
        .await
    }

    pub async fn update_vector_db_config(
        &self,
        org_id: &str,
        config_id: &str,
        request: &VectorDbConfigRequest,
    ) -> Result<VectorDbConfig> {
        self.send_json(
            Method::PUT,
            configs_path(org_id).id(config_id),
            request,
            Failure::ServerOr("Failed to update vector database configuration"),
        )
        .await
    }

    pub async fn delete_vector_db_config(&self, org_id: &str, config_id: &str) -> Result<()> {
        self.send_unit(
            configs_path(org_id).id(config_id),
            RequestOptions::delete(),
            Failure::ServerOr("Failed to delete vector database configuration"),
        )
        .await
    }

    /// Ask the backend to connect to the configured database
    pub async fn test_vector_db_config(&self, org_id: &str, config_id: &str) -> Result<ConnectionTest> {
        let path = configs_path(org_id).id(config_id).segment("test");
        let response = self.request(&path, RequestOptions::post()).await?;
        read_json(response, Failure::ServerOr("Connection test failed")).await
    }

    /// Make a configuration the organization default
    pub async fn set_default_vector_db_config(&self, org_id: &str, config_id: &str) -> Result<()> {
        self.send_unit(
            configs_path(org_id).id(config_id).segment("default"),
            RequestOptions::post(),
            Failure::Fixed("Failed to set default vector database configuration"),
        )
        .await
    }

    pub async fn vector_db_stats(&self, org_id: &str, config_id: &str) -> Result<JsonObject> {
        self.get_json(
            configs_path(org_id).id(config_id).segment("stats"),
            Failure::Fixed("Failed to fetch vector database statistics"),
        )
        .await
    }
}
