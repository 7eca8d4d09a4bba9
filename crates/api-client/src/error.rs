//! Error types for the console client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of a backend call
///
/// 401 and 403 are intercepted by the request primitive and never carry a
/// body; every other non-2xx status becomes `RequestFailed`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered 401: the credential is missing, expired or revoked
    #[error("Unauthorized")]
    Unauthenticated,

    /// Backend answered 403: authenticated but not allowed
    #[error("Forbidden")]
    Forbidden,

    /// Any other non-2xx answer
    #[error("{message}")]
    RequestFailed { status: StatusCode, message: String },

    /// Network or protocol failure before a status was received
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx answer whose body did not match the expected schema
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Request body could not be serialized
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Caller-supplied identifier cannot be placed in the request path
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored credential cannot be sent as a header value
    #[error("Credential contains characters not allowed in a header")]
    InvalidCredential,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),
}

/// Discriminant of [`ApiError`] for callers that branch on the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    RequestFailed,
    Transport,
    Decode,
    InvalidInput,
    Configuration,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthenticated => ErrorKind::Unauthenticated,
            ApiError::Forbidden => ErrorKind::Forbidden,
            ApiError::RequestFailed { .. } => ErrorKind::RequestFailed,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::InvalidInput(_) => ErrorKind::InvalidInput,
            ApiError::Encode(_)
            | ApiError::InvalidCredential
            | ApiError::InvalidBaseUrl(_)
            | ApiError::MissingConfig(_) => ErrorKind::Configuration,
        }
    }

    /// True for both 401 and 403 answers
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthenticated | ApiError::Forbidden)
    }

    /// HTTP status behind the failure, when one was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthenticated => Some(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden => Some(StatusCode::FORBIDDEN),
            ApiError::RequestFailed { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub(crate) fn request_failed(status: StatusCode, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: message.to_string(),
        }
    }
}

impl From<console_core::Error> for ApiError {
    fn from(err: console_core::Error) -> Self {
        match err {
            console_core::Error::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

/// Failure of a page loader
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The page must not render; send the user elsewhere
    #[error("Redirect ({status}) to {location}")]
    Redirect { status: StatusCode, location: String },

    /// The page failed; rendered by the surrounding error boundary
    #[error("{message}")]
    Page { status: StatusCode, message: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl LoaderError {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            status: StatusCode::FOUND,
            location: location.into(),
        }
    }

    pub fn page(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Page {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_covers_both_auth_statuses() {
        assert!(ApiError::Unauthenticated.is_unauthorized());
        assert!(ApiError::Forbidden.is_unauthorized());
        assert!(!ApiError::request_failed(StatusCode::NOT_FOUND, "gone").is_unauthorized());
    }

    #[test]
    fn test_request_failed_displays_message_only() {
        let err = ApiError::request_failed(StatusCode::BAD_REQUEST, "Failed to create organization");
        assert_eq!(err.to_string(), "Failed to create organization");
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }
}
