// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound replies.
//!
//! Unlike ingestion, reply delivery surfaces failures to the caller;
//! an agent must find out their reply never reached the platform.

use serde_json::json;
use tracing::info;

use inlet_core::types::{Conversation, FacebookConversationData};
use inlet_core::InletError;

use crate::router::PageContext;
use crate::FacebookIngestor;

impl FacebookIngestor {
    /// Post a reply into the platform thread behind `conversation`.
    ///
    /// Messenger conversations get a direct message to the original
    /// sender. Feed conversations get a comment on the canonical post,
    /// and the returned comment id is written back onto `message_id` so
    /// the webhook echo of our own comment is deduplicated on ingest.
    pub async fn post_reply(
        &self,
        conversation: &Conversation,
        text: &str,
        message_id: &str,
    ) -> Result<(), InletError> {
        let integration = self
            .integrations
            .find(&conversation.integration_id)
            .await?
            .ok_or_else(|| InletError::NotFound {
                kind: "integration",
                id: conversation.integration_id.clone(),
            })?;

        let app = self.app(&integration.app_id).ok_or_else(|| InletError::NotFound {
            kind: "facebook app",
            id: integration.app_id.clone(),
        })?;

        let ctx = PageContext {
            page_id: conversation.page_id.clone(),
            app_access_token: app.access_token.clone(),
        };
        let page_token = self.processor.page_access_token(&ctx).await?;

        match &conversation.data {
            FacebookConversationData::Messenger { sender_id, .. } => {
                let body = json!({
                    "recipient": { "id": sender_id },
                    "message": { "text": text },
                });
                self.processor
                    .graph
                    .post("me/messages", &page_token, &body)
                    .await?;
                info!(conversation_id = %conversation.id, "messenger reply sent");
            }
            FacebookConversationData::Feed { post_id, .. } => {
                let body = json!({ "message": text });
                let response = self
                    .processor
                    .graph
                    .post(&format!("{post_id}/comments"), &page_token, &body)
                    .await?;

                let comment_id = response["id"].as_str().ok_or_else(|| {
                    InletError::Internal(format!(
                        "comment response for post {post_id} missing id"
                    ))
                })?;
                self.processor
                    .messages
                    .set_comment_id(message_id, comment_id)
                    .await?;
                info!(
                    conversation_id = %conversation.id,
                    comment_id,
                    "feed comment posted"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, MockGraph};
    use crate::FacebookApp;
    use inlet_core::types::{
        ConversationStatus, NewConversation, NewMessage, FacebookMessageData,
    };
    use inlet_core::{ConversationStore, MessageStore};
    use serde_json::json;
    use std::sync::Arc;

    struct ReplyHarness {
        store: Arc<MemoryStore>,
        graph: Arc<MockGraph>,
        ingestor: FacebookIngestor,
        integration_id: String,
    }

    fn reply_harness() -> ReplyHarness {
        let store = MemoryStore::new();
        let graph = MockGraph::new();
        let app = FacebookApp {
            id: "app-1".into(),
            access_token: "app-token".into(),
            verify_token: None,
        };
        let ingestor = FacebookIngestor::new(
            vec![app],
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            graph.clone(),
        );
        let integration = store.add_integration("app-1", &["page-1"]);
        graph.on_get("page-1?fields=access_token", json!({ "access_token": "pt" }));
        ReplyHarness {
            store,
            graph,
            ingestor,
            integration_id: integration.id,
        }
    }

    async fn seed_conversation(
        h: &ReplyHarness,
        data: FacebookConversationData,
    ) -> (Conversation, String) {
        let conversation = ConversationStore::create(
            &*h.store,
            NewConversation {
                integration_id: h.integration_id.clone(),
                customer_id: "cus-1".into(),
                status: ConversationStatus::New,
                content: "hello".into(),
                page_id: "page-1".into(),
                data,
            },
        )
        .await
        .unwrap();

        let message = MessageStore::create(
            &*h.store,
            NewMessage {
                conversation_id: conversation.id.clone(),
                customer_id: "cus-1".into(),
                content: "hello".into(),
                attachments: vec![],
                data: FacebookMessageData::Messenger,
                comment_id: None,
                internal: false,
            },
        )
        .await
        .unwrap();

        (conversation, message.id)
    }

    #[tokio::test]
    async fn feed_reply_comments_on_post_and_records_comment_id() {
        let h = reply_harness();
        h.graph.on_post_response(json!({ "id": "c-77" }));

        let (conversation, message_id) = seed_conversation(
            &h,
            FacebookConversationData::Feed {
                sender_id: "user-a".into(),
                sender_name: None,
                post_id: "post-y".into(),
            },
        )
        .await;

        h.ingestor
            .post_reply(&conversation, "thanks!", &message_id)
            .await
            .unwrap();

        let posts = h.graph.post_calls.lock().unwrap().clone();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "post-y/comments");
        assert_eq!(posts[0].1, json!({ "message": "thanks!" }));

        // The recorded comment id makes the webhook echo of this comment
        // a duplicate on ingest.
        let echoed = MessageStore::find_by_comment_id(&*h.store, "c-77")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(echoed.id, message_id);
    }

    #[tokio::test]
    async fn messenger_reply_targets_original_sender() {
        let h = reply_harness();

        let (conversation, message_id) = seed_conversation(
            &h,
            FacebookConversationData::Messenger {
                sender_id: "user-a".into(),
                sender_name: None,
                recipient_id: "page-1".into(),
            },
        )
        .await;

        h.ingestor
            .post_reply(&conversation, "got it", &message_id)
            .await
            .unwrap();

        let posts = h.graph.post_calls.lock().unwrap().clone();
        assert_eq!(posts[0].0, "me/messages");
        assert_eq!(posts[0].1["recipient"]["id"], "user-a");
        assert_eq!(posts[0].1["message"]["text"], "got it");
    }

    #[tokio::test]
    async fn reply_for_unconfigured_app_is_an_error() {
        let h = reply_harness();
        let orphan = h.store.add_integration("app-unknown", &["page-1"]);

        let (mut conversation, message_id) = seed_conversation(
            &h,
            FacebookConversationData::Messenger {
                sender_id: "user-a".into(),
                sender_name: None,
                recipient_id: "page-1".into(),
            },
        )
        .await;
        conversation.integration_id = orphan.id;

        let err = h
            .ingestor
            .post_reply(&conversation, "hi", &message_id)
            .await
            .unwrap_err();
        assert!(matches!(err, InletError::NotFound { kind: "facebook app", .. }));
    }
}
