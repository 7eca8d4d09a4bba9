//! Page loaders
//!
//! Each loader fetches exactly what one page needs before it renders. Results
//! serialize to the flat object the page template reads; loaders that build
//! on parent data flatten it into their own output.
//!
//! Every API failure goes through [`AuthBoundary::guard`] before it reaches
//! the caller, so a 401 anywhere ends the session.

use console_core::models::{
    MemberRole, Organization, Project, Prompt, Provider, UserApiKey, UserProfile,
};
use console_core::session::credential_from_cookie_header;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

use crate::boundary::{AuthBoundary, LOGIN_ROUTE};
use crate::client::ApiClient;
use crate::error::{LoaderError, Result};

/// Application shell data, resolved in the client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppLayoutData {
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
}

/// Application shell data, resolved from the request cookie
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerLayoutData {
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppHomeData {
    pub organizations: Vec<Organization>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgLayoutData {
    pub organizations: Vec<Organization>,
    pub organization_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgPageData {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectLayoutData {
    pub project: Project,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPageData {
    pub prompt: Prompt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectConfigData {
    pub providers: Vec<Provider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiKeysAdminData {
    #[serde(rename = "apiKeys")]
    pub api_keys: Vec<UserApiKey>,
    pub projects: Vec<Project>,
    pub organization_id: String,
}

/// Parent data plus the identifiers of the agent page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPageData<P> {
    #[serde(flatten)]
    pub parent: P,
    pub organization_id: String,
    pub agent_id: String,
}

#[derive(Debug, Clone)]
pub struct Loaders {
    client: ApiClient,
    boundary: AuthBoundary,
}

impl Loaders {
    pub fn new(client: ApiClient, boundary: AuthBoundary) -> Self {
        Self { client, boundary }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Current user and, inside an organization, the user's role there
    ///
    /// Never fails: without a usable session the page renders logged out.
    pub async fn app_layout(&self, org_id: Option<&str>) -> AppLayoutData {
        let user = match self.boundary.guard(self.client.profile().await) {
            Ok(user) => user,
            Err(e) => {
                debug!("No user for application layout: {}", e);
                return AppLayoutData::default();
            }
        };

        let Some(org_id) = org_id else {
            return AppLayoutData {
                user: Some(user),
                role: None,
            };
        };

        match self.boundary.guard(self.client.organization(org_id).await) {
            Ok(organization) => {
                let role = organization.role_of(&user.id);
                AppLayoutData {
                    user: Some(user),
                    role,
                }
            }
            Err(e) => {
                debug!(org_id, "Organization unavailable for layout: {}", e);
                AppLayoutData::default()
            }
        }
    }

    /// Server-side shell check using the `token` cookie of the request
    ///
    /// Does not touch the session store; the credential comes from the cookie.
    pub async fn app_layout_server(
        &self,
        cookie_header: Option<&str>,
    ) -> std::result::Result<ServerLayoutData, LoaderError> {
        let Some(credential) = cookie_header.and_then(credential_from_cookie_header) else {
            return Err(LoaderError::redirect(LOGIN_ROUTE));
        };

        let user = match self.client.profile_with_credential(&credential).await {
            Ok(user) => Some(user),
            Err(e) => {
                debug!("Cookie credential rejected: {}", e);
                None
            }
        };
        Ok(ServerLayoutData { user })
    }

    pub async fn app_home(&self) -> Result<AppHomeData> {
        let organizations = self.boundary.guard(self.client.organizations().await)?;
        Ok(AppHomeData { organizations })
    }

    pub async fn org_layout(&self, org_id: Option<&str>) -> Result<OrgLayoutData> {
        let organizations = self.boundary.guard(self.client.organizations().await)?;
        Ok(OrgLayoutData {
            organizations,
            organization_id: org_id.map(str::to_string),
        })
    }

    pub async fn org_page(&self, org_id: &str) -> Result<OrgPageData> {
        let projects = self.boundary.guard(self.client.projects(org_id).await)?;
        Ok(OrgPageData { projects })
    }

    pub async fn project_layout(&self, org_id: &str, project_id: &str) -> Result<ProjectLayoutData> {
        let project = self
            .boundary
            .guard(self.client.project(org_id, project_id).await)?;
        Ok(ProjectLayoutData { project })
    }

    pub async fn prompt_page(
        &self,
        org_id: &str,
        project_id: &str,
        prompt_id: &str,
    ) -> Result<PromptPageData> {
        let prompt = self
            .boundary
            .guard(self.client.prompt(org_id, project_id, prompt_id).await)?;
        Ok(PromptPageData { prompt })
    }

    pub async fn project_config(&self) -> Result<ProjectConfigData> {
        let providers = self.boundary.guard(self.client.providers().await)?;
        Ok(ProjectConfigData { providers })
    }

    /// API keys and projects of an organization, fetched concurrently
    ///
    /// Fails as soon as either request fails; the other is dropped.
    pub async fn api_keys_admin(
        &self,
        org_id: &str,
    ) -> std::result::Result<ApiKeysAdminData, LoaderError> {
        let loaded = tokio::try_join!(
            self.client.user_api_keys(org_id),
            self.client.projects(org_id)
        );

        match self.boundary.guard(loaded) {
            Ok((api_keys, projects)) => Ok(ApiKeysAdminData {
                api_keys,
                projects,
                organization_id: org_id.to_string(),
            }),
            Err(e) => {
                error!(org_id, "Failed to load API keys: {}", e);
                Err(LoaderError::page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load API keys",
                ))
            }
        }
    }

    /// Handoffs page renders from its parent data alone
    pub fn handoffs<P>(&self, parent: P) -> P {
        parent
    }

    pub fn agent_page<P>(&self, parent: P, org_id: &str, agent_id: &str) -> AgentPageData<P> {
        AgentPageData {
            parent,
            organization_id: org_id.to_string(),
            agent_id: agent_id.to_string(),
        }
    }
}
