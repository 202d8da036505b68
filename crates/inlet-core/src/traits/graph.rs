// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote Graph API seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GraphError;

/// Synchronous-from-the-caller's-view access to the platform Graph API.
///
/// No retries are performed at this seam; each resolver decides how a
/// failure affects the event being processed.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// GET a graph path with the given access token.
    async fn get(&self, path: &str, access_token: &str) -> Result<Value, GraphError>;

    /// POST a JSON body to a graph path with the given access token.
    async fn post(
        &self,
        path: &str,
        access_token: &str,
        body: &Value,
    ) -> Result<Value, GraphError>;
}
