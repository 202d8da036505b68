// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger (direct message) normalization.

use inlet_core::types::{
    Attachment, ConversationStatus, FacebookConversationData, FacebookMessageData,
    Integration, NormalizedEvent,
};
use inlet_core::InletError;

use crate::events::MessagingEvent;
use crate::router::{PageContext, WebhookProcessor};

/// Content label for attachment-only messages.
const ATTACHMENT_FALLBACK: &str = "attachment";

impl WebhookProcessor {
    /// Normalize one messenger sub-event and hand it to the resolver.
    ///
    /// Callers have already checked that the event carries a message.
    pub(crate) async fn conversation_by_messenger(
        &self,
        integration: &Integration,
        ctx: &PageContext,
        event: &MessagingEvent,
    ) -> Result<Option<String>, InletError> {
        let Some(message) = &event.message else {
            return Ok(None);
        };

        let content = message
            .text
            .clone()
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| ATTACHMENT_FALLBACK.to_string());

        let attachments: Vec<Attachment> = message
            .attachments
            .iter()
            .map(|raw| Attachment {
                kind: raw.kind.clone(),
                url: raw
                    .payload
                    .as_ref()
                    .and_then(|payload| payload.url.clone())
                    .unwrap_or_default(),
            })
            .collect();

        let conversation_data = FacebookConversationData::Messenger {
            sender_id: event.sender.id.clone(),
            sender_name: event.sender.name.clone(),
            recipient_id: event.recipient.id.clone(),
        };

        let normalized = NormalizedEvent {
            key: conversation_data.key(),
            status: ConversationStatus::New,
            sender_id: event.sender.id.clone(),
            conversation_data,
            content,
            attachments,
            message_data: FacebookMessageData::Messenger,
            comment_id: None,
        };

        self.resolve_conversation(integration, ctx, normalized).await
    }
}
