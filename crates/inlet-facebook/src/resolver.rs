// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and customer resolution.
//!
//! The conversation resolver is the shared tail of both event paths:
//! find or create the thread keyed by the merge key, reopen it
//! unconditionally on inbound activity, and append the message. Customer
//! resolution is cache-first; the remote profile fetch happens at most
//! once per (integration, external user id).

use tracing::{debug, warn};

use inlet_core::types::{Integration, NewConversation, NewCustomer, NewMessage, NormalizedEvent};
use inlet_core::InletError;

use crate::router::{PageContext, WebhookProcessor};

impl WebhookProcessor {
    /// Find or create the conversation for `event` and append its message.
    ///
    /// Returns the created message id, or `None` when the event resolved
    /// to a no-op (customer resolution failed on a remote call).
    pub(crate) async fn resolve_conversation(
        &self,
        integration: &Integration,
        ctx: &PageContext,
        event: NormalizedEvent,
    ) -> Result<Option<String>, InletError> {
        let existing = self
            .conversations
            .find_by_key(&integration.id, &event.key)
            .await?;

        let conversation = match existing {
            // Any inbound activity reopens the thread, whatever its prior status.
            Some(found) => self.conversations.reopen(&found.id).await?,
            None => {
                let Some(customer_id) = self
                    .resolve_customer(integration, ctx, &event.sender_id)
                    .await?
                else {
                    return Ok(None);
                };

                self.conversations
                    .create(NewConversation {
                        integration_id: integration.id.clone(),
                        customer_id,
                        status: event.status,
                        content: event.content.clone(),
                        page_id: ctx.page_id.clone(),
                        data: event.conversation_data.clone(),
                    })
                    .await?
            }
        };

        // Authorship is resolved independently of conversation creation, so
        // the message is attributed even on the found-conversation branch.
        let Some(customer_id) = self
            .resolve_customer(integration, ctx, &event.sender_id)
            .await?
        else {
            return Ok(None);
        };

        let message = self
            .messages
            .create(NewMessage {
                conversation_id: conversation.id.clone(),
                customer_id,
                content: event.content,
                attachments: event.attachments,
                data: event.message_data,
                comment_id: event.comment_id,
                internal: false,
            })
            .await?;

        debug!(
            conversation_id = %conversation.id,
            message_id = %message.id,
            "message appended"
        );
        Ok(Some(message.id))
    }

    /// Resolve a customer id for a platform user, creating one on first sight.
    ///
    /// An existing customer short-circuits without any remote call. When
    /// the profile fetch fails (expired token included), the event is
    /// dropped rather than creating a customer from a bad response.
    pub(crate) async fn resolve_customer(
        &self,
        integration: &Integration,
        ctx: &PageContext,
        external_id: &str,
    ) -> Result<Option<String>, InletError> {
        if let Some(customer) = self
            .customers
            .find_by_external_id(&integration.id, external_id)
            .await?
        {
            return Ok(Some(customer.id));
        }

        let profile = match self.get_via_page_token(ctx, external_id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(external_id, error = %err, "profile fetch failed, dropping event");
                return Ok(None);
            }
        };

        // Feed profile responses carry a direct name; messenger ones split
        // it into first and last.
        let name = match profile["name"].as_str() {
            Some(name) => name.to_string(),
            None => {
                let first = profile["first_name"].as_str().unwrap_or_default();
                let last = profile["last_name"].as_str().unwrap_or_default();
                format!("{first} {last}").trim().to_string()
            }
        };
        let profile_pic = profile["profile_pic"].as_str().map(str::to_string);

        let customer = self
            .customers
            .create(NewCustomer {
                integration_id: integration.id.clone(),
                name,
                external_id: external_id.to_string(),
                profile_pic,
            })
            .await?;

        Ok(Some(customer.id))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::harness;
    use serde_json::json;

    #[tokio::test]
    async fn known_customer_resolves_without_remote_calls() {
        let h = harness(&["page-1"], "page-1");
        h.graph.on_get("page-1?fields=access_token", json!({ "access_token": "pt" }));
        h.graph.script_profile("user-a", json!({ "name": "Ada" }));

        let first = h
            .processor
            .resolve_customer(&h.integration, &h.ctx, "user-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(h.graph.gets_matching("user-a"), 1);

        let second = h
            .processor
            .resolve_customer(&h.integration, &h.ctx, "user-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        // Fast path: no further token mint, no further profile fetch.
        assert_eq!(h.graph.gets_matching("user-a"), 1);
        assert_eq!(h.graph.gets_matching("page-1?fields=access_token"), 1);
        assert_eq!(h.store.customer_count(), 1);
    }

    #[tokio::test]
    async fn profile_name_falls_back_to_first_and_last() {
        let h = harness(&["page-1"], "page-1");
        h.graph.on_get("page-1?fields=access_token", json!({ "access_token": "pt" }));
        h.graph
            .script_profile("user-b", json!({ "first_name": "Grace", "last_name": "Hopper" }));

        h.processor
            .resolve_customer(&h.integration, &h.ctx, "user-b")
            .await
            .unwrap()
            .unwrap();

        let customers = h.store.customers.lock().unwrap().clone();
        assert_eq!(customers[0].name, "Grace Hopper");
    }

    #[tokio::test]
    async fn token_failure_during_profile_fetch_creates_nothing() {
        let h = harness(&["page-1"], "page-1");
        h.graph.expire_token_on("page-1?fields=access_token");

        let resolved = h
            .processor
            .resolve_customer(&h.integration, &h.ctx, "user-a")
            .await
            .unwrap();
        assert!(resolved.is_none());
        assert_eq!(h.store.customer_count(), 0);
    }
}
