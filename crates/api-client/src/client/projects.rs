//! Project, provider and project API key endpoints

use console_core::models::{CreateProjectRequest, Project, ProjectApiKey, Provider};
use console_core::path::ApiPath;
use reqwest::Method;

use super::{org_path, project_path, ApiClient, Failure, RequestOptions};
use crate::error::Result;

impl ApiClient {
    pub async fn projects(&self, org_id: &str) -> Result<Vec<Project>> {
        self.get_json(
            org_path(org_id).segment("projects"),
            Failure::Fixed("Failed to fetch projects"),
        )
        .await
    }

    pub async fn project(&self, org_id: &str, project_id: &str) -> Result<Project> {
        self.get_json(
            project_path(org_id, project_id),
            Failure::Fixed("Failed to fetch project"),
        )
        .await
    }

    pub async fn create_project(
        &self,
        org_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project> {
        self.send_json(
            Method::POST,
            org_path(org_id).segment("projects"),
            &CreateProjectRequest { name, description },
            Failure::ServerOr("Failed to create project"),
        )
        .await
    }

    /// LLM providers and their models
    pub async fn providers(&self) -> Result<Vec<Provider>> {
        self.get_json(
            ApiPath::root("providers"),
            Failure::Fixed("Failed to fetch providers"),
        )
        .await
    }

    pub async fn create_api_key(
        &self,
        org_id: &str,
        project_id: &str,
        key: &ProjectApiKey,
    ) -> Result<ProjectApiKey> {
        self.send_json(
            Method::POST,
            project_path(org_id, project_id).segment("api-keys"),
            key,
            Failure::Fixed("Failed to create api key"),
        )
        .await
    }

    pub async fn delete_api_key(&self, org_id: &str, project_id: &str, key_id: &str) -> Result<()> {
        self.send_unit(
            project_path(org_id, project_id)
                .segment("api-keys")
                .id(key_id),
            RequestOptions::delete(),
            Failure::Fixed("Failed to delete api key"),
        )
        .await
    }
}
