// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation message queries.
//!
//! Attachments and platform annotations are stored as JSON text; the
//! remote comment id gets its own indexed column because the feed dedup
//! path queries by it on every comment event.

use rusqlite::params;

use inlet_core::{ConversationMessage, InletError, NewMessage};

use crate::database::{Database, map_tr_err};
use crate::queries::{column_decode_err, now_ts};

const COLUMNS: &str = "id, conversation_id, customer_id, content, attachments, data, \
                       comment_id, internal, created_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationMessage> {
    let attachments_json: String = row.get(4)?;
    let data_json: String = row.get(5)?;
    Ok(ConversationMessage {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        customer_id: row.get(2)?,
        content: row.get(3)?,
        attachments: serde_json::from_str(&attachments_json)
            .map_err(|e| column_decode_err(4, e))?,
        data: serde_json::from_str(&data_json).map_err(|e| column_decode_err(5, e))?,
        comment_id: row.get(6)?,
        internal: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Find a message bearing the given remote comment id.
pub async fn find_by_comment_id(
    db: &Database,
    comment_id: &str,
) -> Result<Option<ConversationMessage>, InletError> {
    let comment_id = comment_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM conversation_messages WHERE comment_id = ?1"
            ))?;
            match stmt.query_row(params![comment_id], map_row) {
                Ok(message) => Ok(Some(message)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Append a message to a conversation.
pub async fn create(db: &Database, message: NewMessage) -> Result<ConversationMessage, InletError> {
    let stored = ConversationMessage {
        id: uuid::Uuid::new_v4().to_string(),
        conversation_id: message.conversation_id,
        customer_id: message.customer_id,
        content: message.content,
        attachments: message.attachments,
        data: message.data,
        comment_id: message.comment_id,
        internal: message.internal,
        created_at: now_ts(),
    };

    let row = stored.clone();
    let attachments_json =
        serde_json::to_string(&row.attachments).map_err(|e| InletError::Storage {
            source: Box::new(e),
        })?;
    let data_json = serde_json::to_string(&row.data).map_err(|e| InletError::Storage {
        source: Box::new(e),
    })?;

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversation_messages (id, conversation_id, customer_id, content,
                                                    attachments, data, comment_id, internal,
                                                    created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    row.id,
                    row.conversation_id,
                    row.customer_id,
                    row.content,
                    attachments_json,
                    data_json,
                    row.comment_id,
                    row.internal,
                    row.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    Ok(stored)
}

/// Record the remote comment id on an existing message.
pub async fn set_comment_id(
    db: &Database,
    message_id: &str,
    comment_id: &str,
) -> Result<(), InletError> {
    let message_id = message_id.to_string();
    let comment_id = comment_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE conversation_messages SET comment_id = ?1 WHERE id = ?2",
                params![comment_id, message_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
