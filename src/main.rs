// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::query_service::QueryService;
use crate::application::resource_service::ResourceService;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::http_upstream::HttpUpstreamClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, list_connections, list_variables, query_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_settings()?;
    if settings.upstream.api_key.is_empty() {
        tracing::warn!("No API key configured; upstream calls will be rejected");
    }

    // Create upstream client (infrastructure layer)
    let client = Arc::new(HttpUpstreamClient::new(
        settings.upstream.base_url.clone(),
        Duration::from_secs(settings.upstream.timeout_secs),
    )?);
    tracing::info!(base_url = client.base_url(), "Upstream API configured");

    // Create services (application layer)
    let query_service = QueryService::new(client.clone(), settings.upstream.api_key.clone());
    let resource_service = ResourceService::new(client.clone(), settings.upstream.api_key.clone());

    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState {
        query_service,
        resource_service,
        api_key_configured: !settings.upstream.api_key.is_empty(),
        shutdown: shutdown.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/query", post(query_data))
        .route("/resources/variables", get(list_variables))
        .route("/resources/connections", get(list_connections))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = settings.server.listen_addr.parse()?;
    tracing::info!("Starting inview-query-bridge on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down, cancelling in-flight queries");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
