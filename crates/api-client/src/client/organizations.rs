//! Organization and membership endpoints

use console_core::models::{
    CreateOrganizationRequest, InviteMemberRequest, MemberRole, Organization,
};
use console_core::path::ApiPath;
use reqwest::Method;

use super::{org_path, ApiClient, Failure, RequestOptions};
use crate::error::Result;

impl ApiClient {
    /// Organizations the current user belongs to
    pub async fn organizations(&self) -> Result<Vec<Organization>> {
        self.get_json(
            ApiPath::root("organizations"),
            Failure::Fixed("Failed to fetch organizations"),
        )
        .await
    }

    pub async fn organization(&self, org_id: &str) -> Result<Organization> {
        self.get_json(org_path(org_id), Failure::Fixed("Failed to fetch organizations"))
            .await
    }

    pub async fn create_organization(
        &self,
        request: &CreateOrganizationRequest,
    ) -> Result<Organization> {
        self.send_json(
            Method::POST,
            ApiPath::root("organizations"),
            request,
            Failure::Fixed("Failed to create organization"),
        )
        .await
    }

    pub async fn invite_member(&self, org_id: &str, email: &str, role: MemberRole) -> Result<()> {
        let options = RequestOptions::post().json(&InviteMemberRequest { email, role })?;
        self.send_unit(
            org_path(org_id).segment("members"),
            options,
            Failure::Fixed("Failed to invite user to organization"),
        )
        .await
    }

    pub async fn remove_member(&self, org_id: &str, user_id: &str) -> Result<()> {
        self.send_unit(
            org_path(org_id).segment("members").id(user_id),
            RequestOptions::delete(),
            Failure::Fixed("Failed to delete user to organization"),
        )
        .await
    }
}
