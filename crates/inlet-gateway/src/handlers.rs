// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.
//!
//! The platform treats any non-2xx webhook response as a delivery
//! failure and will retry, so the POST handler acknowledges every
//! delivery it can parse and keeps processing failures in the logs.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use inlet_facebook::{FacebookApp, WebhookPayload};

use crate::server::GatewayState;

/// Body the platform expects on an acknowledged delivery.
const ACK_BODY: &str = "EVENT_RECEIVED";

/// Response body for GET /v1/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /webhooks/facebook/{app_id}
///
/// Webhook subscription handshake: echo `hub.challenge` when the mode is
/// `subscribe` and the verify token matches the configured app.
pub async fn get_webhook_verify(
    State(state): State<GatewayState>,
    Path(app_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match verify_subscription(state.ingestor.app(&app_id), &params) {
        Ok(challenge) => (StatusCode::OK, challenge).into_response(),
        Err(status) => {
            warn!(app_id, "webhook verification rejected");
            status.into_response()
        }
    }
}

/// POST /webhooks/facebook/{app_id}
///
/// Ingest one delivery. Ignorable events are already absorbed below this
/// layer; anything that still fails is logged and acknowledged anyway so
/// the platform does not redeliver into the same failure.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Path(app_id): Path<String>,
    Json(payload): Json<WebhookPayload>,
) -> Response {
    let Some(app) = state.ingestor.app(&app_id) else {
        warn!(app_id, "delivery for unconfigured app");
        return (StatusCode::OK, ACK_BODY).into_response();
    };

    if let Err(err) = state.ingestor.ingest(app, &payload).await {
        error!(app_id, error = %err, "webhook ingestion failed");
    }

    (StatusCode::OK, ACK_BODY).into_response()
}

/// GET /v1/health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

fn verify_subscription(
    app: Option<&FacebookApp>,
    params: &HashMap<String, String>,
) -> Result<String, StatusCode> {
    let Some(app) = app else {
        return Err(StatusCode::NOT_FOUND);
    };
    let Some(expected) = &app.verify_token else {
        return Err(StatusCode::FORBIDDEN);
    };

    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge");

    match (mode, token, challenge) {
        (Some("subscribe"), Some(token), Some(challenge)) if token == expected => {
            Ok(challenge.clone())
        }
        _ => Err(StatusCode::FORBIDDEN),
    }
}
