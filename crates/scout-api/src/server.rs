//! HTTP server: router, CORS, shared state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use scout_ai::{AiClient, ToolDefinition, ToolExecutor};
use scout_common::ScoutError;

use crate::routes;

/// Immutable per-process state shared by all requests. Conversation state
/// never lives here; every request builds its own session.
pub struct AppState {
    pub client: Arc<dyn AiClient>,
    pub executor: Arc<dyn ToolExecutor>,
    pub tools: Vec<ToolDefinition>,
    pub system_prompt: String,
    pub max_tool_rounds: u32,
}

pub fn router(state: Arc<AppState>) -> Router {
    // The original endpoint was called cross-origin from a static page;
    // keep it permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/chat", post(routes::chat))
        .route("/v1/chat/simple", post(routes::chat_simple))
        .with_state(state)
        .layer(cors)
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> scout_common::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("scout-api listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ScoutError::Server(e.to_string()))?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

async fn health() -> &'static str {
    "ok"
}
