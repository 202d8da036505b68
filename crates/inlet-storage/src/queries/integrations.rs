// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration record queries. Page id sets are stored as JSON arrays.

use rusqlite::params;

use inlet_core::{InletError, Integration};

use crate::database::{Database, map_tr_err};
use crate::queries::{column_decode_err, now_ts};

const COLUMNS: &str = "id, app_id, page_ids, created_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Integration> {
    let page_ids_json: String = row.get(2)?;
    let page_ids =
        serde_json::from_str(&page_ids_json).map_err(|e| column_decode_err(2, e))?;
    Ok(Integration {
        id: row.get(0)?,
        app_id: row.get(1)?,
        page_ids,
        created_at: row.get(3)?,
    })
}

/// Register a new integration for a platform app.
pub async fn create(
    db: &Database,
    app_id: &str,
    page_ids: &[String],
) -> Result<Integration, InletError> {
    let integration = Integration {
        id: uuid::Uuid::new_v4().to_string(),
        app_id: app_id.to_string(),
        page_ids: page_ids.to_vec(),
        created_at: now_ts(),
    };
    let row = integration.clone();
    let page_ids_json = serde_json::to_string(&row.page_ids).map_err(|e| InletError::Storage {
        source: Box::new(e),
    })?;

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO integrations (id, app_id, page_ids, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![row.id, row.app_id, page_ids_json, row.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    Ok(integration)
}

/// All integrations registered under a platform app id.
pub async fn find_by_app_id(db: &Database, app_id: &str) -> Result<Vec<Integration>, InletError> {
    let app_id = app_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM integrations WHERE app_id = ?1 ORDER BY created_at"
            ))?;
            let rows = stmt.query_map(params![app_id], map_row)?;
            let mut integrations = Vec::new();
            for row in rows {
                integrations.push(row?);
            }
            Ok(integrations)
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a single integration by id.
pub async fn find(db: &Database, id: &str) -> Result<Option<Integration>, InletError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM integrations WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], map_row) {
                Ok(integration) => Ok(Some(integration)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}
