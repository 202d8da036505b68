// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inlet serve` command implementation.
//!
//! Wires SQLite storage, the Graph API client, and the webhook ingestor
//! together and hands them to the gateway server.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use inlet_config::model::InletConfig;
use inlet_core::InletError;
use inlet_facebook::{FacebookApp, FacebookIngestor};
use inlet_gateway::{start_server, GatewayState, ServerConfig};
use inlet_graph::GraphClient;
use inlet_storage::SqliteStorage;

pub async fn run(config: InletConfig) -> Result<(), InletError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");

    let graph = Arc::new(GraphClient::new(config.facebook.graph_base_url.clone())?);

    let apps: Vec<FacebookApp> = config
        .facebook
        .apps
        .iter()
        .map(|app| FacebookApp {
            id: app.id.clone(),
            access_token: app.access_token.clone(),
            verify_token: app.verify_token.clone(),
        })
        .collect();
    if apps.is_empty() {
        warn!("no facebook apps configured, all deliveries will be acknowledged and dropped");
    }

    let ingestor = Arc::new(FacebookIngestor::new(
        apps,
        storage.clone(),
        storage.clone(),
        storage.clone(),
        storage.clone(),
        graph,
    ));

    if !config.gateway.enabled {
        info!("gateway disabled, nothing to serve");
        return Ok(());
    }

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let state = GatewayState {
        ingestor,
        start_time: Instant::now(),
    };
    start_server(&server_config, state).await
}
