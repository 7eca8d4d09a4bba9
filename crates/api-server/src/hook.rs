//! Edge hook run on every request
//!
//! Reads the `token` cookie so the request can be correlated with a session
//! and passes the request through untouched. It sets no cookies.

use axum::{
    extract::Request,
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};
use console_core::session::credential_from_cookie_header;
use tracing::debug;

pub async fn observe_token_cookie(request: Request, next: Next) -> Response {
    let has_token = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|header| credential_from_cookie_header(header).is_some());

    debug!(
        method = %request.method(),
        path = %request.uri().path(),
        has_token,
        "Incoming request"
    );

    next.run(request).await
}
