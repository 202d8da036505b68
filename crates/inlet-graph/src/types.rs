// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for Graph API responses.

use serde::Deserialize;

/// A page the authenticated user administers, as returned by `/me/accounts`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PageInfo {
    pub id: String,
    pub name: String,
}

/// Envelope for `/me/accounts`.
#[derive(Debug, Deserialize)]
pub(crate) struct PageListResponse {
    pub data: Vec<PageInfo>,
}

/// Error envelope returned by the Graph API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub code: Option<i64>,
}
