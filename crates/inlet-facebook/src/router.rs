// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook entry routing.
//!
//! Classifies a delivery into per-page entries and dispatches messenger
//! and feed sub-events to their normalizers. Sub-events are processed
//! strictly sequentially; each one completes all of its remote calls and
//! store writes before the next begins.

use std::sync::Arc;

use tracing::{debug, warn};

use inlet_core::types::Integration;
use inlet_core::{ConversationStore, CustomerStore, GraphApi, InletError, MessageStore};

use crate::events::{WebhookEntry, WebhookPayload};

/// Page scope for one entry's remote calls.
///
/// Carried explicitly through every resolver call instead of living as
/// mutable state on the processor, so concurrent deliveries cannot
/// observe each other's page.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Page the entry was delivered for.
    pub page_id: String,
    /// App-level token used to fetch the page's own access token.
    pub app_access_token: String,
}

/// Processes webhook deliveries for one integration at a time.
///
/// Holds the store and graph seams behind trait objects so tests can
/// substitute in-memory fakes for all four.
pub struct WebhookProcessor {
    pub(crate) conversations: Arc<dyn ConversationStore>,
    pub(crate) customers: Arc<dyn CustomerStore>,
    pub(crate) messages: Arc<dyn MessageStore>,
    pub(crate) graph: Arc<dyn GraphApi>,
}

impl WebhookProcessor {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        customers: Arc<dyn CustomerStore>,
        messages: Arc<dyn MessageStore>,
        graph: Arc<dyn GraphApi>,
    ) -> Self {
        Self {
            conversations,
            customers,
            messages,
            graph,
        }
    }

    /// Process one delivery on behalf of `integration`.
    ///
    /// An entry for a page the integration does not own aborts the whole
    /// delivery, including entries for valid pages that follow it.
    pub async fn process(
        &self,
        integration: &Integration,
        app_access_token: &str,
        payload: &WebhookPayload,
    ) -> Result<(), InletError> {
        if payload.object != "page" {
            debug!(object = %payload.object, "ignoring non-page delivery");
            return Ok(());
        }

        for entry in &payload.entry {
            if !integration.owns_page(&entry.id) {
                warn!(
                    page_id = %entry.id,
                    integration_id = %integration.id,
                    "entry for unrecognized page, aborting delivery"
                );
                return Ok(());
            }

            let ctx = PageContext {
                page_id: entry.id.clone(),
                app_access_token: app_access_token.to_string(),
            };

            self.process_entry(integration, &ctx, entry).await?;
        }

        Ok(())
    }

    async fn process_entry(
        &self,
        integration: &Integration,
        ctx: &PageContext,
        entry: &WebhookEntry,
    ) -> Result<(), InletError> {
        for event in &entry.messaging {
            if event.message.is_some() {
                self.conversation_by_messenger(integration, ctx, event)
                    .await?;
            }
        }

        for change in &entry.changes {
            self.conversation_by_feed(integration, ctx, &change.value)
                .await?;
        }

        Ok(())
    }
}
