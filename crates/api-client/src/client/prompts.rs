//! Prompt endpoints, including execution through the proxy

use console_core::models::{
    CreatePromptRequest, ExecutePromptRequest, Prompt, PromptExecutionPage, TestPromptRequest,
    UpdatePromptRequest,
};
use console_core::path::ApiPath;
use reqwest::Method;
use serde_json::Value;

use super::{project_path, ApiClient, Failure, RequestOptions};
use crate::error::Result;

fn prompts_path(org_id: &str, project_id: &str) -> ApiPath {
    project_path(org_id, project_id).segment("prompts")
}

/// `/proxy/organizations/{org}/projects/{project}`
fn proxy_project_path(org_id: &str, project_id: &str) -> ApiPath {
    ApiPath::root("proxy")
        .segment("organizations")
        .id(org_id)
        .segment("projects")
        .id(project_id)
}

impl ApiClient {
    pub async fn prompts(&self, org_id: &str, project_id: &str) -> Result<Vec<Prompt>> {
        self.get_json(
            prompts_path(org_id, project_id),
            Failure::Fixed("Failed to fetch prompts"),
        )
        .await
    }

    pub async fn prompt(&self, org_id: &str, project_id: &str, prompt_id: &str) -> Result<Prompt> {
        self.get_json(
            prompts_path(org_id, project_id).id(prompt_id),
            Failure::Fixed("Failed to get prompt"),
        )
        .await
    }

    pub async fn create_prompt(
        &self,
        org_id: &str,
        project_id: &str,
        request: &CreatePromptRequest,
    ) -> Result<Prompt> {
        self.send_json(
            Method::POST,
            prompts_path(org_id, project_id),
            request,
            Failure::Fixed("Failed to create prompt"),
        )
        .await
    }

    /// Replace a prompt; fields left `None` are not sent
    pub async fn update_prompt(
        &self,
        org_id: &str,
        project_id: &str,
        prompt_id: &str,
        request: &UpdatePromptRequest,
    ) -> Result<Prompt> {
        self.send_json(
            Method::PUT,
            prompts_path(org_id, project_id).id(prompt_id),
            request,
            Failure::Fixed("Failed to update prompt"),
        )
        .await
    }

    pub async fn delete_prompt(&self, org_id: &str, project_id: &str, prompt_id: &str) -> Result<()> {
        self.send_unit(
            prompts_path(org_id, project_id).id(prompt_id),
            RequestOptions::delete(),
            Failure::Fixed("Failed to delete prompt"),
        )
        .await
    }

    /// Run a saved prompt by name; the result shape depends on the model
    pub async fn execute_prompt(
        &self,
        org_id: &str,
        project_id: &str,
        prompt_name: &str,
        request: &ExecutePromptRequest,
    ) -> Result<Value> {
        self.send_json(
            Method::POST,
            proxy_project_path(org_id, project_id)
                .segment("execute")
                .id(prompt_name),
            request,
            Failure::Fixed("Failed to execute prompt"),
        )
        .await
    }

    /// Run unsaved prompt content against a project API key
    pub async fn test_prompt(&self, request: &TestPromptRequest) -> Result<Value> {
        self.send_json(
            Method::POST,
            ApiPath::root("proxy").segment("test-prompt").trailing_slash(),
            request,
            Failure::Fixed("Failed to execute prompt"),
        )
        .await
    }

    /// One page of execution history; pages start at 1
    pub async fn prompt_executions(
        &self,
        org_id: &str,
        project_id: &str,
        prompt_id: &str,
        page: u32,
    ) -> Result<PromptExecutionPage> {
        self.get_json(
            proxy_project_path(org_id, project_id)
                .segment("prompts")
                .id(prompt_id)
                .segment("executions")
                .query("page", page.max(1)),
            Failure::Fixed("Failed to get prompt executions"),
        )
        .await
    }
}
