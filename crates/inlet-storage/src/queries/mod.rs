// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod conversations;
pub mod customers;
pub mod integrations;
pub mod messages;

/// Current UTC timestamp in the millisecond RFC 3339 form used across
/// all tables (`2026-01-01T00:00:00.000Z`).
pub(crate) fn now_ts() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Wrap a serde failure in a rusqlite error so it can cross the
/// tokio-rusqlite closure boundary.
pub(crate) fn column_decode_err(column: usize, err: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(err),
    )
}
