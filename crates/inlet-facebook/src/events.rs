// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw webhook payload shapes as delivered by the platform.
//!
//! Id fields arrive as numbers on feed deliveries and as strings on
//! messenger deliveries; every id is coerced to a string at the deserialization
//! boundary so identity comparisons downstream work on one textual form.

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Top-level webhook delivery. Only `object = "page"` payloads are processed.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One per-page entry within a delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    /// Page id the entry was delivered for.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Messenger sub-events, present for direct-message activity.
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
    /// Feed sub-events, present for wall activity.
    #[serde(default)]
    pub changes: Vec<FeedChange>,
}

/// A single messenger sub-event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    pub recipient: Participant,
    /// Absent on delivery receipts and read events, which are skipped.
    pub message: Option<MessengerMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessengerMessage {
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<RawAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Option<AttachmentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPayload {
    pub url: Option<String>,
}

/// A single feed sub-event wrapping the value object.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedChange {
    pub value: FeedValue,
}

/// The feed value object: verb, item type, ids, and content fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedValue {
    pub verb: Option<String>,
    pub item: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub sender_id: Option<String>,
    pub sender_name: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub post_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub comment_id: Option<String>,
    pub message: Option<String>,
    pub link: Option<String>,
    pub reaction_type: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub photo_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub video_id: Option<String>,
}

/// Accepts a JSON string or number and yields its string form.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Number(n) => Ok(n.to_string()),
    }
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeId {
        String(String),
        Number(serde_json::Number),
        Null,
        Other(serde_json::Value),
    }

    match MaybeId::deserialize(deserializer)? {
        MaybeId::String(s) => Ok(Some(s)),
        MaybeId::Number(n) => Ok(Some(n.to_string())),
        MaybeId::Null => Ok(None),
        MaybeId::Other(v) => Err(de::Error::custom(format!(
            "expected string or number id, got {v}"
        ))),
    }
}
