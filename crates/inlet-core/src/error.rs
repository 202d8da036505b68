// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Inlet ingestion engine.

use thiserror::Error;

/// The primary error type used across store traits and core operations.
#[derive(Debug, Error)]
pub enum InletError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Graph API errors that must surface to the caller (reply delivery, page listing).
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// A referenced record does not exist.
    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure modes of the remote Graph API client.
///
/// The platform signals an expired or revoked page token with a fixed
/// error body rather than a structured payload; the client maps that
/// onto [`GraphError::TokenExpired`] so callers can branch on it
/// instead of comparing strings.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The access token used for the request is expired or invalid.
    #[error("access token expired or invalid")]
    TokenExpired,

    /// Transport-level failure (connection, timeout, TLS).
    #[error("graph request failed: {message}")]
    Request {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The API answered but the payload is missing an expected field.
    #[error("unexpected graph response: {0}")]
    UnexpectedResponse(String),
}
