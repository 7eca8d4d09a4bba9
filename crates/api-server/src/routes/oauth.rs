//! Google OAuth code exchange
//!
//! The browser receives an authorization code from Google and posts it here.
//! The exchange needs the client secret, so it runs on the server; the
//! response carries the tokens and the account email back to the browser.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{error_response, RouteError};
use crate::state::AppState;

const EXCHANGE_FAILED: &str = "Failed to exchange authorization code";

#[derive(Debug, Deserialize)]
struct ExchangeRequest {
    #[serde(default)]
    code: Option<String>,
}

/// Successful answer of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenSet {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Error answer of the token endpoint
#[derive(Debug, Default, Deserialize)]
struct TokenError {
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExchangeResponse {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    email: String,
}

/// Code from the request body; an unreadable body counts as no code
fn authorization_code(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ExchangeRequest>(body)
        .ok()
        .and_then(|request| request.code)
        .filter(|code| !code.is_empty())
}

fn exchange_failed(err: impl std::fmt::Display) -> RouteError {
    error!("Token exchange error: {}", err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, EXCHANGE_FAILED)
}

async fn exchange_code(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExchangeResponse>, RouteError> {
    let code = authorization_code(&body).ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, "Authorization code is required")
    })?;

    let google = state.google();
    let Some((client_id, client_secret)) = google.credentials() else {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Google OAuth credentials not configured",
        ));
    };

    let mut form = vec![
        ("code", code.as_str()),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];
    if let Some(redirect_uri) = &google.redirect_uri {
        form.push(("redirect_uri", redirect_uri.as_str()));
    }
    form.push(("grant_type", "authorization_code"));

    let response = state
        .http()
        .post(&google.token_url)
        .form(&form)
        .send()
        .await
        .map_err(exchange_failed)?;

    if !response.status().is_success() {
        let status = response.status();
        let rejection = response.json::<TokenError>().await.unwrap_or_default();
        warn!(%status, "Token endpoint rejected the authorization code");
        let message = rejection
            .error_description
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| EXCHANGE_FAILED.to_string());
        return Err(error_response(StatusCode::BAD_REQUEST, message));
    }

    let tokens: TokenSet = response.json().await.map_err(exchange_failed)?;
    let email = fetch_email(&state, &tokens.access_token).await;
    info!("Exchanged Google authorization code");

    Ok(Json(ExchangeResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        email,
    }))
}

/// Account email for the access token, empty when it cannot be read
async fn fetch_email(state: &AppState, access_token: &str) -> String {
    let response = match state
        .http()
        .get(&state.google().userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            debug!(status = %response.status(), "User info request rejected");
            return String::new();
        }
        Err(e) => {
            debug!("User info request failed: {}", e);
            return String::new();
        }
    };

    match response.json::<UserInfo>().await {
        Ok(info) => info.email.unwrap_or_default(),
        Err(e) => {
            debug!("User info body unreadable: {}", e);
            String::new()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/google/exchange", post(exchange_code))
}
