//! HTTP surface: a single `/generate` route behind CORS and request logging.

pub mod middleware;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::post,
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::ai::CompletionClient;
use crate::config::{ServerConfig, Settings};

pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState, server: &ServerConfig) -> Result<Router> {
    let cors = cors_layer(&server.cors_origins)?;

    Ok(Router::new()
        .route(
            "/generate",
            post(routes::generate).options(routes::preflight),
        )
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o.trim() == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let allowed = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim())
                .with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(allowed)))
}

/// Run the web server until Ctrl-C.
pub async fn run_server(settings: &Settings, client: Arc<dyn CompletionClient>) -> Result<()> {
    let state = AppState::new(client, settings);
    let app = create_router(state, &settings.server)?;

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
