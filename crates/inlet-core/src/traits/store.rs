// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for the conversation model.
//!
//! Multiple deliveries for one integration may execute concurrently at
//! the transport layer, and the resolvers run find-then-create sequences.
//! Implementations must therefore back `create` with a unique constraint
//! on the identity key (conversation merge key, customer external id) and
//! return the surviving row on conflict, never a duplicate.

use async_trait::async_trait;

use crate::error::InletError;
use crate::types::{
    Conversation, ConversationKey, ConversationMessage, Customer, Integration, NewConversation,
    NewCustomer, NewMessage,
};

/// Read access to integration records.
#[async_trait]
pub trait IntegrationStore: Send + Sync {
    /// All integrations registered under the given platform application id.
    async fn find_by_app_id(&self, app_id: &str) -> Result<Vec<Integration>, InletError>;

    /// Look up a single integration by id.
    async fn find(&self, id: &str) -> Result<Option<Integration>, InletError>;

    /// Register a new integration.
    async fn create(
        &self,
        app_id: &str,
        page_ids: &[String],
    ) -> Result<Integration, InletError>;
}

/// Conversation persistence keyed by the merge key.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Find the conversation holding the merge key within an integration.
    async fn find_by_key(
        &self,
        integration_id: &str,
        key: &ConversationKey,
    ) -> Result<Option<Conversation>, InletError>;

    /// Create a conversation, or return the existing one if a concurrent
    /// delivery already created the same merge key.
    async fn create(&self, conversation: NewConversation) -> Result<Conversation, InletError>;

    /// Reset a conversation's status to `new`, unconditionally.
    async fn reopen(&self, id: &str) -> Result<Conversation, InletError>;
}

/// Customer persistence keyed by (integration id, external user id).
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_by_external_id(
        &self,
        integration_id: &str,
        external_id: &str,
    ) -> Result<Option<Customer>, InletError>;

    /// Create a customer, or return the existing one on identity conflict.
    async fn create(&self, customer: NewCustomer) -> Result<Customer, InletError>;
}

/// Message persistence, including the comment-id dedup lookup.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Find a message bearing the given remote comment id. A hit means
    /// the inbound feed event is a duplicate delivery.
    async fn find_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Option<ConversationMessage>, InletError>;

    async fn create(&self, message: NewMessage) -> Result<ConversationMessage, InletError>;

    /// Record the remote comment id returned when a reply was posted,
    /// closing the dedup loop for the echoed webhook delivery.
    async fn set_comment_id(&self, message_id: &str, comment_id: &str)
        -> Result<(), InletError>;
}
