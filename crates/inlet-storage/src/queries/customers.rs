// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer queries, keyed by (integration id, external user id).

use rusqlite::params;

use inlet_core::{Customer, InletError, NewCustomer};

use crate::database::{Database, map_tr_err};
use crate::queries::now_ts;

const COLUMNS: &str = "id, integration_id, name, external_id, profile_pic, created_at";

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        integration_id: row.get(1)?,
        name: row.get(2)?,
        external_id: row.get(3)?,
        profile_pic: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Find a customer by its platform identity within an integration.
pub async fn find_by_external_id(
    db: &Database,
    integration_id: &str,
    external_id: &str,
) -> Result<Option<Customer>, InletError> {
    let integration_id = integration_id.to_string();
    let external_id = external_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM customers
                 WHERE integration_id = ?1 AND external_id = ?2"
            ))?;
            match stmt.query_row(params![integration_id, external_id], map_row) {
                Ok(customer) => Ok(Some(customer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Create a customer, returning the surviving row on identity conflict.
pub async fn create(db: &Database, customer: NewCustomer) -> Result<Customer, InletError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = now_ts();
    let integration_id = customer.integration_id.clone();
    let external_id = customer.external_id.clone();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customers (id, integration_id, name, external_id, profile_pic,
                                        created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (integration_id, external_id) DO NOTHING",
                params![
                    id,
                    customer.integration_id,
                    customer.name,
                    customer.external_id,
                    customer.profile_pic,
                    now,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    let found = find_by_external_id(db, &integration_id, &external_id).await?;
    found.ok_or_else(|| InletError::Internal(format!(
        "customer vanished after upsert: {integration_id}/{external_id}"
    )))
}
