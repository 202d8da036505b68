// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes and shared state for webhook delivery and health checks.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use inlet_core::InletError;
use inlet_facebook::FacebookIngestor;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub ingestor: Arc<FacebookIngestor>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Gateway server configuration (mirrors GatewayConfig from inlet-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/webhooks/facebook/{app_id}",
            get(handlers::get_webhook_verify).post(handlers::post_webhook),
        )
        .route("/v1/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves routes:
/// - GET  /webhooks/facebook/{app_id} (subscription handshake)
/// - POST /webhooks/facebook/{app_id} (event delivery)
/// - GET  /v1/health
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), InletError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| InletError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| InletError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
