//! Authentication endpoints

use console_core::models::{
    LoginRequest, OAuthProvider, RegisterRequest, TokenResponse, UpdateProfileRequest, UserProfile,
};
use console_core::path::ApiPath;
use console_core::session::Credential;
use reqwest::{Method, StatusCode};

use super::{read_json, ApiClient, Failure, RequestOptions};
use crate::error::{ApiError, Result};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn auth_path(endpoint: &'static str) -> ApiPath {
    ApiPath::root("auth").segment(endpoint)
}

impl ApiClient {
    /// Exchange email and password for a credential
    ///
    /// Does not touch the session; see `AuthBoundary::sign_in`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        let options = RequestOptions::post().json(&LoginRequest { email, password })?;
        let response = match self.request(&auth_path("login"), options).await {
            // A rejected login is a wrong password, not an expired session.
            Err(ApiError::Unauthenticated) | Err(ApiError::Forbidden) => {
                return Err(ApiError::request_failed(
                    StatusCode::UNAUTHORIZED,
                    INVALID_CREDENTIALS,
                ))
            }
            other => other?,
        };

        let body: TokenResponse = read_json(response, Failure::Fixed(INVALID_CREDENTIALS)).await?;
        Ok(Credential::from(body.token))
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Credential> {
        let body: TokenResponse = self
            .send_json(
                Method::POST,
                auth_path("register"),
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
                Failure::ServerOr("Registration failed"),
            )
            .await?;
        Ok(Credential::from(body.token))
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        self.get_json(auth_path("profile"), Failure::Fixed("Failed to get profile"))
            .await
    }

    /// Fetch the profile with an explicit credential instead of the session
    ///
    /// Used by server-side loaders that only have the request cookie.
    pub async fn profile_with_credential(&self, credential: &Credential) -> Result<UserProfile> {
        let response = self
            .send(&auth_path("profile"), RequestOptions::get(), Some(credential))
            .await?;
        read_json(response, Failure::Fixed("Failed to get profile")).await
    }

    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> Result<UserProfile> {
        self.send_json(
            Method::PUT,
            auth_path("profile"),
            update,
            Failure::ServerOr("Failed to update profile"),
        )
        .await
    }

    /// Identity providers offered on the login screen
    pub async fn oauth_providers(&self) -> Result<Vec<OAuthProvider>> {
        self.get_json(
            auth_path("oauth/providers"),
            Failure::Fixed("Failed to fetch OAuth providers"),
        )
        .await
    }
}
