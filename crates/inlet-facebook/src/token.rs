// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page token resolution.
//!
//! Several operations need a page-scoped token before they can touch a
//! page-owned resource: post canonicalization, customer profile fetches,
//! and outbound replies. The two-step fetch lives here once.

use serde_json::Value;

use inlet_core::GraphError;

use crate::router::{PageContext, WebhookProcessor};

impl WebhookProcessor {
    /// Fetch the current page's own access token using the app token.
    pub(crate) async fn page_access_token(
        &self,
        ctx: &PageContext,
    ) -> Result<String, GraphError> {
        let path = format!("{}?fields=access_token", ctx.page_id);
        let response = self.graph.get(&path, &ctx.app_access_token).await?;

        response["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                GraphError::UnexpectedResponse(format!(
                    "page {} token response missing access_token",
                    ctx.page_id
                ))
            })
    }

    /// GET a resource through the current page's token.
    pub(crate) async fn get_via_page_token(
        &self,
        ctx: &PageContext,
        path: &str,
    ) -> Result<Value, GraphError> {
        let token = self.page_access_token(ctx).await?;
        self.graph.get(path, &token).await
    }
}
