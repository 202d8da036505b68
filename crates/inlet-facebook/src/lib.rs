// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facebook webhook ingestion for Inlet.
//!
//! Reconciles inbound page deliveries (messenger messages and wall feed
//! activity) into conversations, customers, and messages, deduplicating
//! redelivered events and resolving canonical identifiers through the
//! Graph API.

pub mod events;
pub mod feed;
pub mod messenger;
pub mod reply;
pub mod resolver;
pub mod router;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use inlet_core::types::Integration;
use inlet_core::{
    ConversationStore, CustomerStore, GraphApi, InletError, IntegrationStore, MessageStore,
};

pub use events::WebhookPayload;
pub use router::{PageContext, WebhookProcessor};

/// One registered platform application, as configured.
#[derive(Debug, Clone)]
pub struct FacebookApp {
    pub id: String,
    /// App-level access token, used to mint page tokens.
    pub access_token: String,
    /// Token echoed during the webhook subscription handshake.
    pub verify_token: Option<String>,
}

/// Entry point for webhook ingestion and outbound replies.
///
/// Fans a delivery out across every integration registered for the
/// receiving application id.
pub struct FacebookIngestor {
    apps: Vec<FacebookApp>,
    pub(crate) integrations: Arc<dyn IntegrationStore>,
    pub(crate) processor: WebhookProcessor,
}

impl FacebookIngestor {
    pub fn new(
        apps: Vec<FacebookApp>,
        integrations: Arc<dyn IntegrationStore>,
        conversations: Arc<dyn ConversationStore>,
        customers: Arc<dyn CustomerStore>,
        messages: Arc<dyn MessageStore>,
        graph: Arc<dyn GraphApi>,
    ) -> Self {
        Self {
            apps,
            integrations,
            processor: WebhookProcessor::new(conversations, customers, messages, graph),
        }
    }

    /// Look up a configured app by its platform application id.
    pub fn app(&self, app_id: &str) -> Option<&FacebookApp> {
        self.apps.iter().find(|app| app.id == app_id)
    }

    /// Process one webhook delivery for `app` across all of its integrations.
    pub async fn ingest(
        &self,
        app: &FacebookApp,
        payload: &WebhookPayload,
    ) -> Result<(), InletError> {
        let integrations = self.integrations.find_by_app_id(&app.id).await?;
        for integration in &integrations {
            self.processor
                .process(integration, &app.access_token, payload)
                .await?;
        }
        Ok(())
    }

    /// Integrations registered for an app, for diagnostics and tooling.
    pub async fn integrations_for_app(
        &self,
        app_id: &str,
    ) -> Result<Vec<Integration>, InletError> {
        self.integrations.find_by_app_id(app_id).await
    }
}
