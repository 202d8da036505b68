// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Facebook Graph API.
//!
//! Provides [`GraphClient`] which handles request construction, access
//! token injection, and error classification. Expired or revoked tokens
//! surface as [`GraphError::TokenExpired`] so callers can branch on the
//! condition without inspecting response bodies.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use inlet_core::{GraphApi, GraphError};

use crate::types::{ApiErrorResponse, PageInfo, PageListResponse};

/// OAuthException error code for an expired or invalidated token.
const TOKEN_ERROR_CODE: i64 = 190;

/// HTTP client for Graph API communication.
///
/// One client instance is shared across all apps and pages; the access
/// token travels with each call rather than living on the client, since
/// a single webhook delivery can require user, app, and page tokens.
#[derive(Debug, Clone)]
pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
}

impl GraphClient {
    /// Creates a new Graph API client rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GraphError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GraphError::Request {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Lists the pages the token's user administers, via `/me/accounts`.
    pub async fn get_page_list(&self, access_token: &str) -> Result<Vec<PageInfo>, GraphError> {
        let value = self.get("me/accounts?limit=100", access_token).await?;
        let pages: PageListResponse =
            serde_json::from_value(value).map_err(|e| GraphError::UnexpectedResponse(format!(
                "malformed /me/accounts payload: {e}"
            )))?;
        Ok(pages.data)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response(response: reqwest::Response) -> Result<Value, GraphError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| GraphError::Request {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                GraphError::UnexpectedResponse(format!("non-JSON success body: {e}"))
            });
        }

        if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
            let is_oauth = api_err.error.type_.as_deref() == Some("OAuthException");
            if is_oauth || api_err.error.code == Some(TOKEN_ERROR_CODE) {
                warn!(status = %status, message = %api_err.error.message, "access token rejected");
                return Err(GraphError::TokenExpired);
            }
            return Err(GraphError::Request {
                message: format!(
                    "graph API error ({}): {}",
                    api_err.error.code.unwrap_or_default(),
                    api_err.error.message
                ),
                source: None,
            });
        }

        // Some proxy layers flatten token failures into this bare string
        // instead of the structured error envelope.
        if body.trim() == "Error processing https request" {
            return Err(GraphError::TokenExpired);
        }

        Err(GraphError::Request {
            message: format!("graph API returned {status}: {body}"),
            source: None,
        })
    }
}

#[async_trait]
impl GraphApi for GraphClient {
    async fn get(&self, path: &str, access_token: &str) -> Result<Value, GraphError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| GraphError::Request {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(path, status = %response.status(), "graph GET response received");
        Self::handle_response(response).await
    }

    async fn post(
        &self,
        path: &str,
        access_token: &str,
        body: &Value,
    ) -> Result<Value, GraphError> {
        let response = self
            .client
            .post(self.url(path))
            .query(&[("access_token", access_token)])
            .json(body)
            .send()
            .await
            .map_err(|e| GraphError::Request {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(path, status = %response.status(), "graph POST response received");
        Self::handle_response(response).await
    }
}
