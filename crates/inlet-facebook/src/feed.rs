// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feed (wall post) normalization.
//!
//! Each gate below terminates the event as a no-op, never an error. The
//! delivered post id is unstable across redeliveries of the same logical
//! post, so the canonical id fetched through the page token is the one
//! that reaches the merge key.

use tracing::{debug, warn};

use inlet_core::types::{
    Attachment, ConversationStatus, FacebookConversationData, FacebookMessageData,
    Integration, NormalizedEvent,
};
use inlet_core::InletError;

use crate::events::FeedValue;
use crate::router::{PageContext, WebhookProcessor};

impl WebhookProcessor {
    /// Normalize one feed value and hand it to the conversation resolver.
    ///
    /// Returns the created message id, or `None` for the many ignorable
    /// shapes: wrong verb, likes, duplicates, empty content, and remote
    /// failures during canonicalization.
    pub(crate) async fn conversation_by_feed(
        &self,
        integration: &Integration,
        ctx: &PageContext,
        value: &FeedValue,
    ) -> Result<Option<String>, InletError> {
        // Only additions produce conversations, and likes are additions
        // that never do.
        if value.verb.as_deref() != Some("add") {
            return Ok(None);
        }
        if value.item.as_deref() == Some("like") {
            return Ok(None);
        }

        if let Some(comment_id) = &value.comment_id {
            if self.messages.find_by_comment_id(comment_id).await?.is_some() {
                debug!(comment_id, "comment already ingested, skipping duplicate");
                return Ok(None);
            }
        }

        let Some(sender_id) = value.sender_id.clone() else {
            debug!("feed value without sender id, skipping");
            return Ok(None);
        };

        // Photo and video shares arrive without text; fall back to the
        // link. Check-ins can have neither and are skipped.
        let content = match (&value.message, &value.link) {
            (Some(message), _) if !message.is_empty() => message.clone(),
            (_, Some(link)) if !link.is_empty() => link.clone(),
            _ => return Ok(None),
        };

        let Some(delivered_post_id) = value.post_id.clone() else {
            debug!("feed value without post id, skipping");
            return Ok(None);
        };

        let post = match self.get_via_page_token(ctx, &delivered_post_id).await {
            Ok(post) => post,
            Err(err) => {
                warn!(
                    post_id = %delivered_post_id,
                    error = %err,
                    "post canonicalization failed, dropping event"
                );
                return Ok(None);
            }
        };
        let Some(post_id) = post["id"].as_str().map(str::to_string) else {
            warn!(post_id = %delivered_post_id, "post lookup response missing id, dropping event");
            return Ok(None);
        };

        // The page replying on its own wall is an admin echo, not open work.
        let status = if integration.owns_page(&sender_id) {
            ConversationStatus::Closed
        } else {
            ConversationStatus::New
        };

        let conversation_data = FacebookConversationData::Feed {
            sender_id: sender_id.clone(),
            sender_name: value.sender_name.clone(),
            post_id,
        };

        let event = NormalizedEvent {
            key: conversation_data.key(),
            status,
            sender_id: sender_id.clone(),
            conversation_data,
            content,
            attachments: Vec::<Attachment>::new(),
            message_data: FacebookMessageData::Feed {
                sender_id,
                sender_name: value.sender_name.clone(),
                item: value.item.clone(),
                reaction_type: value.reaction_type.clone(),
                photo_id: value.photo_id.clone(),
                video_id: value.video_id.clone(),
                link: value.link.clone(),
            },
            comment_id: value.comment_id.clone(),
        };

        self.resolve_conversation(integration, ctx, event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;
    use serde_json::json;

    fn feed_value(sender_id: &str, message: &str, post_id: &str) -> FeedValue {
        FeedValue {
            verb: Some("add".into()),
            sender_id: Some(sender_id.into()),
            message: Some(message.into()),
            post_id: Some(post_id.into()),
            ..FeedValue::default()
        }
    }

    #[tokio::test]
    async fn own_page_post_creates_closed_conversation_with_canonical_post_id() {
        // Integration owns pages P and Q; P posts on Q's wall.
        let h = harness(&["page-p", "page-q"], "page-q");
        h.graph.script_page("page-q", "post-x", "post-y");
        h.graph.script_profile("page-p", json!({ "name": "Page P" }));

        let message_id = h
            .processor
            .conversation_by_feed(&h.integration, &h.ctx, &feed_value("page-p", "hi", "post-x"))
            .await
            .unwrap();
        assert!(message_id.is_some());

        let conversations = h.store.conversations.lock().unwrap().clone();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].status, ConversationStatus::Closed);
        match &conversations[0].data {
            FacebookConversationData::Feed { post_id, .. } => assert_eq!(post_id, "post-y"),
            other => panic!("expected feed data, got {other:?}"),
        }

        let messages = h.store.messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
    }

    #[tokio::test]
    async fn visitor_post_opens_new_conversation() {
        let h = harness(&["page-q"], "page-q");
        h.graph.script_page("page-q", "post-x", "post-y");
        h.graph.script_profile("user-7", json!({ "name": "Visitor" }));

        h.processor
            .conversation_by_feed(&h.integration, &h.ctx, &feed_value("user-7", "hello", "post-x"))
            .await
            .unwrap();

        let conversations = h.store.conversations.lock().unwrap().clone();
        assert_eq!(conversations[0].status, ConversationStatus::New);
    }

    #[tokio::test]
    async fn duplicate_comment_id_is_inert() {
        let h = harness(&["page-q"], "page-q");
        h.graph.script_page("page-q", "post-x", "post-y");
        h.graph.script_profile("user-7", json!({ "name": "Visitor" }));

        let mut value = feed_value("user-7", "hello", "post-x");
        value.comment_id = Some("c-9".into());

        let first = h
            .processor
            .conversation_by_feed(&h.integration, &h.ctx, &value)
            .await
            .unwrap();
        assert!(first.is_some());

        let second = h
            .processor
            .conversation_by_feed(&h.integration, &h.ctx, &value)
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(h.store.message_count(), 1);
        assert_eq!(h.store.conversation_count(), 1);
    }

    #[tokio::test]
    async fn non_add_verbs_are_ignored() {
        let h = harness(&["page-q"], "page-q");
        let mut value = feed_value("user-7", "edited", "post-x");
        value.verb = Some("edited".into());

        let result = h
            .processor
            .conversation_by_feed(&h.integration, &h.ctx, &value)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(h.store.conversation_count(), 0);
    }

    #[tokio::test]
    async fn likes_are_ignored() {
        let h = harness(&["page-q"], "page-q");
        let mut value = feed_value("user-7", "", "post-x");
        value.item = Some("like".into());

        let result = h
            .processor
            .conversation_by_feed(&h.integration, &h.ctx, &value)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(h.store.conversation_count(), 0);
    }

    #[tokio::test]
    async fn no_text_no_link_is_ignored() {
        let h = harness(&["page-q"], "page-q");
        let value = FeedValue {
            verb: Some("add".into()),
            item: Some("checkin".into()),
            sender_id: Some("user-7".into()),
            post_id: Some("post-x".into()),
            ..FeedValue::default()
        };

        let result = h
            .processor
            .conversation_by_feed(&h.integration, &h.ctx, &value)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(h.store.conversation_count(), 0);
    }

    #[tokio::test]
    async fn link_substitutes_for_missing_text() {
        let h = harness(&["page-q"], "page-q");
        h.graph.script_page("page-q", "post-x", "post-y");
        h.graph.script_profile("user-7", json!({ "name": "Visitor" }));

        let value = FeedValue {
            verb: Some("add".into()),
            item: Some("photo".into()),
            sender_id: Some("user-7".into()),
            post_id: Some("post-x".into()),
            link: Some("https://cdn/photo.jpg".into()),
            ..FeedValue::default()
        };

        h.processor
            .conversation_by_feed(&h.integration, &h.ctx, &value)
            .await
            .unwrap();

        let messages = h.store.messages.lock().unwrap().clone();
        assert_eq!(messages[0].content, "https://cdn/photo.jpg");
    }

    #[tokio::test]
    async fn expired_page_token_drops_event() {
        let h = harness(&["page-q"], "page-q");
        h.graph.expire_token_on("page-q?fields=access_token");

        let result = h
            .processor
            .conversation_by_feed(&h.integration, &h.ctx, &feed_value("user-7", "hi", "post-x"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(h.store.conversation_count(), 0);
        assert_eq!(h.store.customer_count(), 0);
    }

    #[tokio::test]
    async fn redelivered_post_reopens_instead_of_duplicating() {
        let h = harness(&["page-q"], "page-q");
        h.graph.script_page("page-q", "post-x", "post-y");
        // Redeliveries of the same logical post come with varying ids.
        h.graph.on_get("post-x2", json!({ "id": "post-y" }));
        h.graph.script_profile("user-7", json!({ "name": "Visitor" }));

        h.processor
            .conversation_by_feed(&h.integration, &h.ctx, &feed_value("user-7", "hi", "post-x"))
            .await
            .unwrap();
        h.store.conversations.lock().unwrap()[0].status = ConversationStatus::Closed;

        h.processor
            .conversation_by_feed(&h.integration, &h.ctx, &feed_value("user-7", "again", "post-x2"))
            .await
            .unwrap();

        let conversations = h.store.conversations.lock().unwrap().clone();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].status, ConversationStatus::New);
        assert_eq!(h.store.message_count(), 2);
    }
}
