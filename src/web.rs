use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::agent::AgentRuntime;
use crate::api::{self, AppState};

/// Upper bound for one `/api/ask` turn: places, weather and routing in sequence
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn app(agent: Arc<dyn AgentRuntime>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(AppState { agent }))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
}

pub async fn run(port: u16, agent: Arc<dyn AgentRuntime>) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app(agent))
        .await
        .context("Web server stopped")
}
