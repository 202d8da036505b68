// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Inlet workspace.
//!
//! The conversation model distinguishes the two inbound event shapes
//! (wall feed vs. page messenger) with sum types rather than a free-form
//! metadata bag, so constructing feed fields on a messenger conversation
//! is a compile-time error.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a conversation.
///
/// Any new inbound activity on an existing conversation resets it to
/// [`ConversationStatus::New`], regardless of its prior status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    New,
    Open,
    Closed,
}

/// A tenant's connection to the platform: one app, a set of owned pages.
///
/// Read-only input for ingestion; Inlet never mutates integrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    /// Platform application id this integration is registered under.
    pub app_id: String,
    /// Page ids owned by this integration. Events for any other page
    /// abort the delivery.
    pub page_ids: Vec<String>,
    pub created_at: String,
}

impl Integration {
    /// Whether the given page (or sender) id is one of the owned pages.
    pub fn owns_page(&self, page_id: &str) -> bool {
        self.page_ids.iter().any(|id| id == page_id)
    }
}

/// The merge key used to find an existing conversation to append to
/// rather than create anew.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationKey {
    /// Keyed by the canonical post id (stable across webhook redeliveries).
    Feed { post_id: String },
    /// Keyed by the unordered participant pair, so a reply with the
    /// direction swapped resolves to the same conversation.
    Messenger {
        participant_a: String,
        participant_b: String,
    },
}

impl ConversationKey {
    /// Canonical textual form, unique per integration.
    ///
    /// Messenger participants are sorted so both orderings produce the
    /// same key; the storage layer keeps a unique index on this value.
    pub fn storage_key(&self) -> String {
        match self {
            ConversationKey::Feed { post_id } => format!("feed:{post_id}"),
            ConversationKey::Messenger {
                participant_a,
                participant_b,
            } => {
                let (lo, hi) = if participant_a <= participant_b {
                    (participant_a, participant_b)
                } else {
                    (participant_b, participant_a)
                };
                format!("messenger:{lo}:{hi}")
            }
        }
    }
}

/// Platform-specific conversation fields, one shape per event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FacebookConversationData {
    Feed {
        sender_id: String,
        sender_name: Option<String>,
        /// Canonical post id from the graph lookup, not the delivered one.
        post_id: String,
    },
    Messenger {
        sender_id: String,
        sender_name: Option<String>,
        recipient_id: String,
    },
}

impl FacebookConversationData {
    /// The merge key this conversation is stored under.
    pub fn key(&self) -> ConversationKey {
        match self {
            FacebookConversationData::Feed { post_id, .. } => ConversationKey::Feed {
                post_id: post_id.clone(),
            },
            FacebookConversationData::Messenger {
                sender_id,
                recipient_id,
                ..
            } => ConversationKey::Messenger {
                participant_a: sender_id.clone(),
                participant_b: recipient_id.clone(),
            },
        }
    }
}

/// Platform-specific message annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FacebookMessageData {
    Feed {
        sender_id: String,
        sender_name: Option<String>,
        item: Option<String>,
        reaction_type: Option<String>,
        photo_id: Option<String>,
        video_id: Option<String>,
        link: Option<String>,
    },
    /// Messenger messages carry no extra annotations.
    #[default]
    Messenger,
}

/// One attachment on an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: String,
    /// Empty when the platform delivered no payload URL.
    pub url: String,
}

/// A thread of messages between a customer and an integration's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub integration_id: String,
    pub customer_id: String,
    pub status: ConversationStatus,
    /// Snapshot of the content that opened the conversation.
    pub content: String,
    /// Page the triggering entry was delivered for.
    pub page_id: String,
    pub data: FacebookConversationData,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating a conversation; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub integration_id: String,
    pub customer_id: String,
    pub status: ConversationStatus,
    pub content: String,
    pub page_id: String,
    pub data: FacebookConversationData,
}

/// A platform end-user known to an integration.
///
/// Never updated after creation; an existing customer short-circuits
/// resolution without a remote lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub integration_id: String,
    pub name: String,
    /// Platform user id, always stored in string form (feed deliveries
    /// send it as a number, messenger as a string).
    pub external_id: String,
    pub profile_pic: Option<String>,
    pub created_at: String,
}

/// Fields for creating a customer; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub integration_id: String,
    pub name: String,
    pub external_id: String,
    pub profile_pic: Option<String>,
}

/// One inbound or outbound unit within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub conversation_id: String,
    pub customer_id: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub data: FacebookMessageData,
    /// Remote comment id, the idempotency key for feed replies. Set on
    /// ingest when the event carried one, or after posting a reply.
    pub comment_id: Option<String>,
    pub internal: bool,
    pub created_at: String,
}

/// Fields for creating a message; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: String,
    pub customer_id: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub data: FacebookMessageData,
    pub comment_id: Option<String>,
    pub internal: bool,
}

/// The common normalized event handed from the per-kind normalizers to
/// the conversation resolver.
#[derive(Debug, Clone)]
pub struct NormalizedEvent {
    pub key: ConversationKey,
    pub status: ConversationStatus,
    /// Platform id of the author, in canonical string form.
    pub sender_id: String,
    pub conversation_data: FacebookConversationData,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub message_data: FacebookMessageData,
    /// Comment id carried by the raw event, if any.
    pub comment_id: Option<String>,
}
