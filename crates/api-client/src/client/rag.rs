//! Document indexing and retrieval for a project

use console_core::models::{
    BatchIndexRequest, IndexDocumentRequest, IndexJob, IndexReceipt, JsonObject, SearchRequest,
    SearchResults,
};
use console_core::path::ApiPath;
use reqwest::Method;

use super::{project_path, read_json, ApiClient, Failure, RequestOptions};
use crate::error::Result;

fn rag_path(org_id: &str, project_id: &str) -> ApiPath {
    project_path(org_id, project_id).segment("rag")
}

impl ApiClient {
    pub async fn index_document(
        &self,
        org_id: &str,
        project_id: &str,
        request: &IndexDocumentRequest,
    ) -> Result<IndexReceipt> {
        self.send_json(
            Method::POST,
            rag_path(org_id, project_id).segment("index"),
            request,
            Failure::ServerOr("Failed to index document"),
        )
        .await
    }

    pub async fn batch_index(
        &self,
        org_id: &str,
        project_id: &str,
        request: &BatchIndexRequest,
    ) -> Result<IndexReceipt> {
        self.send_json(
            Method::POST,
            rag_path(org_id, project_id).segment("batch-index"),
            request,
            Failure::ServerOr("Failed to index documents"),
        )
        .await
    }

    pub async fn search(
        &self,
        org_id: &str,
        project_id: &str,
        request: &SearchRequest,
    ) -> Result<SearchResults> {
        self.send_json(
            Method::POST,
            rag_path(org_id, project_id).segment("search"),
            request,
            Failure::ServerOr("Failed to search documents"),
        )
        .await
    }

    pub async fn rag_stats(&self, org_id: &str, project_id: &str) -> Result<JsonObject> {
        self.get_json(
            rag_path(org_id, project_id).segment("stats"),
            Failure::Fixed("Failed to fetch RAG statistics"),
        )
        .await
    }

    /// Remove every indexed document of the project
    pub async fn clear_index(&self, org_id: &str, project_id: &str) -> Result<()> {
        self.send_unit(
            rag_path(org_id, project_id).segment("clear"),
            RequestOptions::delete(),
            Failure::Fixed("Failed to clear index"),
        )
        .await
    }

    pub async fn index_jobs(&self, org_id: &str, project_id: &str) -> Result<Vec<IndexJob>> {
        self.get_json(
            rag_path(org_id, project_id).segment("jobs"),
            Failure::Fixed("Failed to fetch indexing jobs"),
        )
        .await
    }

    pub async fn index_job(&self, org_id: &str, project_id: &str, job_id: &str) -> Result<IndexJob> {
        self.get_json(
            rag_path(org_id, project_id).segment("jobs").id(job_id),
            Failure::Fixed("Failed to fetch indexing job"),
        )
        .await
    }

    pub async fn cancel_index_job(&self, org_id: &str, project_id: &str, job_id: &str) -> Result<()> {
        self.send_unit(
            rag_path(org_id, project_id).segment("jobs").id(job_id),
            RequestOptions::delete(),
            Failure::ServerOr("Failed to cancel indexing job"),
        )
        .await
    }

    pub async fn index_job_stats(&self, org_id: &str, project_id: &str) -> Result<JsonObject> {
        let path = rag_path(org_id, project_id).segment("jobs/stats");
        let response = self.request(&path, RequestOptions::get()).await?;
        read_json(response, Failure::Fixed("Failed to fetch job statistics")).await
    }
}
