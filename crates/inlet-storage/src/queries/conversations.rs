// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation queries.
//!
//! The merge key is stored denormalized in the `merge_key` column with a
//! unique index per integration; `create` is an insert-or-return-existing
//! so concurrent duplicate deliveries cannot produce two conversations
//! for one key.

use std::str::FromStr;

use rusqlite::params;

use inlet_core::{
    Conversation, ConversationKey, ConversationStatus, FacebookConversationData, InletError,
    NewConversation,
};

use crate::database::{Database, map_tr_err};
use crate::queries::now_ts;

const COLUMNS: &str = "id, integration_id, customer_id, status, content, page_id, \
                       kind, sender_id, sender_name, post_id, recipient_id, \
                       created_at, updated_at";

fn decode_err(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        message.into(),
    )
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    let status_text: String = row.get(3)?;
    let status = ConversationStatus::from_str(&status_text)
        .map_err(|_| decode_err(3, format!("unknown conversation status `{status_text}`")))?;

    let kind: String = row.get(6)?;
    let sender_id: String = row.get(7)?;
    let sender_name: Option<String> = row.get(8)?;
    let data = match kind.as_str() {
        "feed" => {
            let post_id: Option<String> = row.get(9)?;
            FacebookConversationData::Feed {
                sender_id,
                sender_name,
                post_id: post_id
                    .ok_or_else(|| decode_err(9, "feed conversation missing post_id".into()))?,
            }
        }
        "messenger" => {
            let recipient_id: Option<String> = row.get(10)?;
            FacebookConversationData::Messenger {
                sender_id,
                sender_name,
                recipient_id: recipient_id.ok_or_else(|| {
                    decode_err(10, "messenger conversation missing recipient_id".into())
                })?,
            }
        }
        other => {
            return Err(decode_err(6, format!("unknown conversation kind `{other}`")));
        }
    };

    Ok(Conversation {
        id: row.get(0)?,
        integration_id: row.get(1)?,
        customer_id: row.get(2)?,
        status,
        content: row.get(4)?,
        page_id: row.get(5)?,
        data,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

/// Find the conversation holding `key` within an integration.
pub async fn find_by_key(
    db: &Database,
    integration_id: &str,
    key: &ConversationKey,
) -> Result<Option<Conversation>, InletError> {
    let integration_id = integration_id.to_string();
    let merge_key = key.storage_key();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM conversations
                 WHERE integration_id = ?1 AND merge_key = ?2"
            ))?;
            match stmt.query_row(params![integration_id, merge_key], map_row) {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Create a conversation, returning the surviving row.
///
/// On a merge-key conflict the insert is a no-op and the existing
/// conversation is returned instead, so a lost find-then-create race
/// cannot create a duplicate.
pub async fn create(
    db: &Database,
    conversation: NewConversation,
) -> Result<Conversation, InletError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = now_ts();
    let merge_key = conversation.data.key().storage_key();

    let (kind, sender_id, sender_name, post_id, recipient_id) = match &conversation.data {
        FacebookConversationData::Feed {
            sender_id,
            sender_name,
            post_id,
        } => (
            "feed",
            sender_id.clone(),
            sender_name.clone(),
            Some(post_id.clone()),
            None,
        ),
        FacebookConversationData::Messenger {
            sender_id,
            sender_name,
            recipient_id,
        } => (
            "messenger",
            sender_id.clone(),
            sender_name.clone(),
            None,
            Some(recipient_id.clone()),
        ),
    };

    let integration_id = conversation.integration_id.clone();
    let lookup_key = merge_key.clone();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations (id, integration_id, customer_id, status, content,
                                            page_id, kind, sender_id, sender_name, post_id,
                                            recipient_id, merge_key, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                 ON CONFLICT (integration_id, merge_key) DO NOTHING",
                params![
                    id,
                    conversation.integration_id,
                    conversation.customer_id,
                    conversation.status.to_string(),
                    conversation.content,
                    conversation.page_id,
                    kind,
                    sender_id,
                    sender_name,
                    post_id,
                    recipient_id,
                    merge_key,
                    now,
                    now,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    // Re-select by key: either our row or the one that won the race.
    let found = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM conversations
                 WHERE integration_id = ?1 AND merge_key = ?2"
            ))?;
            Ok(stmt.query_row(params![integration_id, lookup_key], map_row)?)
        })
        .await
        .map_err(map_tr_err)?;

    Ok(found)
}

/// Reset a conversation's status to `new`, unconditionally.
pub async fn reopen(db: &Database, id: &str) -> Result<Conversation, InletError> {
    let id_owned = id.to_string();
    let now = now_ts();
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE conversations SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![ConversationStatus::New.to_string(), now, id_owned],
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM conversations WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id_owned], map_row) {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)?;

    updated.ok_or_else(|| InletError::NotFound {
        kind: "conversation",
        id: id.to_string(),
    })
}
