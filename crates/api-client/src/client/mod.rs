//! Backend API client
//!
//! [`ApiClient::request`] is the single place where backend calls are made.
//! It attaches the session credential and classifies 401/403 answers; every
//! domain operation (one submodule per resource family) is a thin wrapper
//! that builds an [`ApiPath`], sends a JSON body and decodes the answer.

mod agents;
mod auth;
mod organizations;
mod projects;
mod prompts;
mod rag;
mod statistics;
mod user_api_keys;
mod vector_db;

use console_core::models::ServerMessage;
use console_core::path::ApiPath;
use console_core::session::{Credential, Session};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::stream::EventStream;

/// Method, body and extra headers of a single request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Add a header; it overrides the client defaults
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

/// Message used when an operation gets a non-2xx answer
#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    /// Always this message
    Fixed(&'static str),
    /// The server's `message` field, or this one when absent
    ServerOr(&'static str),
}

/// Client for the orchestration backend
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client without request timeout or retry
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self> {
        let http = Client::builder().build()?;
        Self::with_http_client(http, config, session)
    }

    pub fn with_http_client(http: Client, config: &ClientConfig, session: Session) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &ApiPath) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with the session credential
    ///
    /// 401 becomes [`ApiError::Unauthenticated`] and 403 [`ApiError::Forbidden`]
    /// without reading the body; any other answer is returned as is. A path
    /// with an empty, `.` or `..` identifier fails with
    /// [`ApiError::InvalidInput`] before anything is sent.
    pub async fn request(&self, path: &ApiPath, options: RequestOptions) -> Result<Response> {
        let credential = self.session.get();
        self.send(path, options, credential.as_ref()).await
    }

    async fn send(
        &self,
        path: &ApiPath,
        options: RequestOptions,
        credential: Option<&Credential>,
    ) -> Result<Response> {
        path.validate()?;

        let RequestOptions {
            method,
            body,
            headers: caller_headers,
        } = options;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(credential) = credential {
            let value = HeaderValue::from_str(&credential.bearer())
                .map_err(|_| ApiError::InvalidCredential)?;
            headers.insert(AUTHORIZATION, value);
        }
        // Caller headers replace the defaults.
        headers.extend(caller_headers);

        debug!(
            method = %method,
            path = %path,
            authenticated = credential.is_some(),
            "Sending API request"
        );

        let mut builder = self.http.request(method, self.url(path)).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let response = builder.send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                debug!(path = %path, "Backend rejected the credential");
                Err(ApiError::Unauthenticated)
            }
            StatusCode::FORBIDDEN => {
                debug!(path = %path, "Backend denied access");
                Err(ApiError::Forbidden)
            }
            _ => Ok(response),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: ApiPath, failure: Failure) -> Result<T> {
        let response = self.request(&path, RequestOptions::get()).await?;
        read_json(response, failure).await
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: ApiPath,
        body: &B,
        failure: Failure,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(method).json(body)?;
        let response = self.request(&path, options).await?;
        read_json(response, failure).await
    }

    /// Request whose answer body is not needed
    async fn send_unit(&self, path: ApiPath, options: RequestOptions, failure: Failure) -> Result<()> {
        let response = self.request(&path, options).await?;
        ensure_success(response, failure).await.map(|_| ())
    }

    /// Request whose body is consumed incrementally by the caller
    async fn open_stream(
        &self,
        path: ApiPath,
        options: RequestOptions,
        failure: Failure,
    ) -> Result<EventStream> {
        let options = options.header(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        let response = self.request(&path, options).await?;
        let response = ensure_success(response, failure).await?;
        Ok(EventStream::new(response))
    }
}

/// `/organizations/{org}`
pub(crate) fn org_path(org_id: &str) -> ApiPath {
    ApiPath::root("organizations").id(org_id)
}

/// `/organizations/{org}/projects/{project}`
pub(crate) fn project_path(org_id: &str, project_id: &str) -> ApiPath {
    org_path(org_id).segment("projects").id(project_id)
}

async fn ensure_success(response: Response, failure: Failure) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = match failure {
        Failure::Fixed(message) => message.to_string(),
        Failure::ServerOr(fallback) => response
            .json::<ServerMessage>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    };

    debug!(status = %status, "Request failed: {}", message);
    Err(ApiError::request_failed(status, message))
}

async fn read_json<T: DeserializeOwned>(response: Response, failure: Failure) -> Result<T> {
    let response = ensure_success(response, failure).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ApiError::decode)
}
