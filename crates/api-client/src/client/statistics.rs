//! Usage statistics

use console_core::models::{JsonObject, Period};
use console_core::path::ApiPath;

use super::{org_path, ApiClient, Failure};
use crate::error::Result;

fn statistics_path(org_id: &str) -> ApiPath {
    org_path(org_id).segment("statistics")
}

impl ApiClient {
    pub async fn dashboard_statistics(&self, org_id: &str, period: Period) -> Result<JsonObject> {
        self.get_json(
            statistics_path(org_id)
                .segment("dashboard")
                .query("period", period),
            Failure::Fixed("Failed to fetch dashboard statistics"),
        )
        .await
    }

    pub async fn agent_statistics(
        &self,
        org_id: &str,
        agent_id: &str,
        period: Period,
    ) -> Result<JsonObject> {
        self.get_json(
            statistics_path(org_id)
                .segment("agents")
                .id(agent_id)
                .query("period", period),
            Failure::Fixed("Failed to fetch agent statistics"),
        )
        .await
    }
}
