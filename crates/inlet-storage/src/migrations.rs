// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations versioned via `PRAGMA user_version`.
//!
//! Each entry in [`MIGRATIONS`] is applied once, in order, inside a
//! transaction; `user_version` records how many have run.

use rusqlite::Connection;
use tracing::info;

/// Ordered schema migrations. Append only; never edit a shipped entry.
const MIGRATIONS: &[&str] = &[
    // V1: initial conversation model.
    "CREATE TABLE integrations (
         id          TEXT PRIMARY KEY,
         app_id      TEXT NOT NULL,
         page_ids    TEXT NOT NULL,
         created_at  TEXT NOT NULL
     );
     CREATE INDEX idx_integrations_app_id ON integrations (app_id);

     CREATE TABLE conversations (
         id              TEXT PRIMARY KEY,
         integration_id  TEXT NOT NULL REFERENCES integrations (id),
         customer_id     TEXT NOT NULL,
         status          TEXT NOT NULL,
         content         TEXT NOT NULL,
         page_id         TEXT NOT NULL,
         kind            TEXT NOT NULL,
         sender_id       TEXT NOT NULL,
         sender_name     TEXT,
         post_id         TEXT,
         recipient_id    TEXT,
         merge_key       TEXT NOT NULL,
         created_at      TEXT NOT NULL,
         updated_at      TEXT NOT NULL,
         UNIQUE (integration_id, merge_key)
     );

     CREATE TABLE customers (
         id              TEXT PRIMARY KEY,
         integration_id  TEXT NOT NULL REFERENCES integrations (id),
         name            TEXT NOT NULL,
         external_id     TEXT NOT NULL,
         profile_pic     TEXT,
         created_at      TEXT NOT NULL,
         UNIQUE (integration_id, external_id)
     );

     CREATE TABLE conversation_messages (
         id               TEXT PRIMARY KEY,
         conversation_id  TEXT NOT NULL REFERENCES conversations (id),
         customer_id      TEXT NOT NULL REFERENCES customers (id),
         content          TEXT NOT NULL,
         attachments      TEXT NOT NULL,
         data             TEXT NOT NULL,
         comment_id       TEXT,
         internal         INTEGER NOT NULL DEFAULT 0,
         created_at       TEXT NOT NULL
     );
     CREATE INDEX idx_messages_comment_id ON conversation_messages (comment_id);
     CREATE INDEX idx_messages_conversation_id ON conversation_messages (conversation_id);",
];

/// Run all pending migrations against the given connection.
pub fn run_migrations(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    let applied: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        let version = idx + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        // user_version does not support parameter binding.
        tx.execute_batch(&format!("PRAGMA user_version = {version}"))?;
        tx.commit()?;
        info!(version, "applied schema migration");
    }

    Ok(())
}
