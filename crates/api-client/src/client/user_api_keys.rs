//! Personal API keys scoped to an organization

use console_core::models::{
    CreateUserApiKeyRequest, IssuedUserApiKey, KeyUsageReport, UpdateUserApiKeyRequest, UserApiKey,
};
use console_core::path::ApiPath;
use reqwest::Method;

use super::{org_path, read_json, ApiClient, Failure, RequestOptions};
use crate::error::Result;

fn keys_path(org_id: &str) -> ApiPath {
    org_path(org_id).segment("user-api-keys")
}

impl ApiClient {
    pub async fn user_api_keys(&self, org_id: &str) -> Result<Vec<UserApiKey>> {
        self.get_json(keys_path(org_id), Failure::Fixed("Failed to fetch API keys"))
            .await
    }

    pub async fn user_api_key(&self, org_id: &str, key_id: &str) -> Result<UserApiKey> {
        self.get_json(
            keys_path(org_id).id(key_id),
            Failure::Fixed("Failed to fetch API key"),
        )
        .await
    }

    /// Create a key; the full secret is only returned here
    pub async fn create_user_api_key(
        &self,
        org_id: &str,
        request: &CreateUserApiKeyRequest,
    ) -> Result<IssuedUserApiKey> {
        self.send_json(
            Method::POST,
            keys_path(org_id),
            request,
            Failure::ServerOr("Failed to create API key"),
        )
        .await
    }

    pub async fn update_user_api_key(
        &self,
        org_id: &str,
        key_id: &str,
        request: &UpdateUserApiKeyRequest,
    ) -> Result<UserApiKey> {
        self.send_json(
            Method::PUT,
            keys_path(org_id).id(key_id),
            request,
            Failure::ServerOr("Failed to update API key"),
        )
        .await
    }

    pub async fn delete_user_api_key(&self, org_id: &str, key_id: &str) -> Result<()> {
        self.send_unit(
            keys_path(org_id).id(key_id),
            RequestOptions::delete(),
            Failure::Fixed("Failed to delete API key"),
        )
        .await
    }

    /// Replace the secret of a key; the old secret stops working
    pub async fn rotate_user_api_key(&self, org_id: &str, key_id: &str) -> Result<IssuedUserApiKey> {
        let response = self
            .request(
                &keys_path(org_id).id(key_id).segment("rotate"),
                RequestOptions::post(),
            )
            .await?;
        read_json(response, Failure::ServerOr("Failed to rotate API key")).await
    }

    pub async fn user_api_key_usage(&self, org_id: &str, key_id: &str) -> Result<KeyUsageReport> {
        self.get_json(
            keys_path(org_id).id(key_id).segment("usage"),
            Failure::Fixed("Failed to fetch API key usage"),
        )
        .await
    }
}
