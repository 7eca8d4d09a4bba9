//! Console server
//!
//! Hosts the server-side pieces of the orchestration console: the Google
//! OAuth code exchange and the edge hook that sees every request.

mod config;
mod hook;
mod routes;
mod state;

use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::oauth::router())
        .with_state(state)
        .layer(middleware::from_fn(hook::observe_token_cookie))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "console_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    if config.google.credentials().is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID or GOOGLE_CLIENT_SECRET not set; OAuth exchange will fail");
    }

    let state = AppState::new(config.google);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Console server listening on {}", config.bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
