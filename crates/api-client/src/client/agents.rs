//! Agent endpoints, including conversations and streamed runs

use console_core::models::{
    Agent, AgentExecution, AgentRequest, ChatReply, ChatRequest, Conversation,
    ExecuteAgentRequest, JsonObject,
};
use console_core::path::ApiPath;
use reqwest::Method;
use serde_json::Value;

use super::{project_path, ApiClient, Failure, RequestOptions};
use crate::error::Result;
use crate::stream::EventStream;

fn agents_path(org_id: &str, project_id: &str) -> ApiPath {
    project_path(org_id, project_id).segment("agents")
}

fn agent_path(org_id: &str, project_id: &str, agent_id: &str) -> ApiPath {
    agents_path(org_id, project_id).id(agent_id)
}

impl ApiClient {
    pub async fn agents(&self, org_id: &str, project_id: &str) -> Result<Vec<Agent>> {
        self.get_json(
            agents_path(org_id, project_id),
            Failure::Fixed("Failed to fetch agents"),
        )
        .await
    }

    pub async fn agent(&self, org_id: &str, project_id: &str, agent_id: &str) -> Result<Agent> {
        self.get_json(
            agent_path(org_id, project_id, agent_id),
            Failure::Fixed("Failed to fetch agent"),
        )
        .await
    }

    pub async fn create_agent(
        &self,
        org_id: &str,
        project_id: &str,
        request: &AgentRequest,
    ) -> Result<Agent> {
        self.send_json(
            Method::POST,
            agents_path(org_id, project_id),
            request,
            Failure::ServerOr("Failed to create agent"),
        )
        .await
    }

    pub async fn update_agent(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
        request: &AgentRequest,
    ) -> Result<Agent> {
        self.send_json(
            Method::PUT,
            agent_path(org_id, project_id, agent_id),
            request,
            Failure::ServerOr("Failed to update agent"),
        )
        .await
    }

    pub async fn delete_agent(&self, org_id: &str, project_id: &str, agent_id: &str) -> Result<()> {
        self.send_unit(
            agent_path(org_id, project_id, agent_id),
            RequestOptions::delete(),
            Failure::Fixed("Failed to delete agent"),
        )
        .await
    }

    pub async fn execute_agent(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
        request: &ExecuteAgentRequest,
    ) -> Result<Value> {
        self.send_json(
            Method::POST,
            agent_path(org_id, project_id, agent_id).segment("execute"),
            request,
            Failure::ServerOr("Failed to execute agent"),
        )
        .await
    }

    /// Run an agent and read its output as it is produced
    pub async fn execute_agent_stream(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
        request: &ExecuteAgentRequest,
    ) -> Result<EventStream> {
        self.open_stream(
            agent_path(org_id, project_id, agent_id).segment("execute/stream"),
            RequestOptions::post().json(request)?,
            Failure::ServerOr("Failed to execute agent"),
        )
        .await
    }

    pub async fn chat(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
        request: &ChatRequest,
    ) -> Result<ChatReply> {
        self.send_json(
            Method::POST,
            agent_path(org_id, project_id, agent_id).segment("chat"),
            request,
            Failure::ServerOr("Failed to send message"),
        )
        .await
    }

    /// Send a chat message and read the reply as it is produced
    pub async fn chat_stream(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
        request: &ChatRequest,
    ) -> Result<EventStream> {
        self.open_stream(
            agent_path(org_id, project_id, agent_id).segment("chat/stream"),
            RequestOptions::post().json(request)?,
            Failure::ServerOr("Failed to send message"),
        )
        .await
    }

    pub async fn conversations(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
    ) -> Result<Vec<Conversation>> {
        self.get_json(
            agent_path(org_id, project_id, agent_id).segment("conversations"),
            Failure::Fixed("Failed to fetch conversations"),
        )
        .await
    }

    /// A conversation with its messages; the message shape is agent-specific
    pub async fn conversation(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
        conversation_id: &str,
    ) -> Result<Conversation> {
        self.get_json(
            agent_path(org_id, project_id, agent_id)
                .segment("conversations")
                .id(conversation_id),
            Failure::Fixed("Failed to fetch conversation"),
        )
        .await
    }

    pub async fn agent_executions(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
    ) -> Result<Vec<AgentExecution>> {
        self.get_json(
            agent_path(org_id, project_id, agent_id).segment("executions"),
            Failure::Fixed("Failed to fetch executions"),
        )
        .await
    }

    /// Snippet configuration for calling the agent from outside the console
    pub async fn agent_api_config(
        &self,
        org_id: &str,
        project_id: &str,
        agent_id: &str,
    ) -> Result<JsonObject> {
        self.get_json(
            agent_path(org_id, project_id, agent_id).segment("api-config"),
            Failure::Fixed("Failed to fetch API configuration"),
        )
        .await
    }
}
