// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use inlet_config::model::StorageConfig;
use inlet_core::types::{
    Conversation, ConversationKey, ConversationMessage, Customer, Integration, NewConversation,
    NewCustomer, NewMessage,
};
use inlet_core::{
    ConversationStore, CustomerStore, InletError, IntegrationStore, MessageStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed implementation of all four store traits.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call
/// to [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is
    /// called.
    ///
    /// [`initialize`]: SqliteStorage::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), InletError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| InletError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(&self) -> Result<(), InletError> {
        self.db()?.close().await
    }

    fn db(&self) -> Result<&Database, InletError> {
        self.db.get().ok_or_else(|| InletError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl IntegrationStore for SqliteStorage {
    async fn find_by_app_id(&self, app_id: &str) -> Result<Vec<Integration>, InletError> {
        queries::integrations::find_by_app_id(self.db()?, app_id).await
    }

    async fn find(&self, id: &str) -> Result<Option<Integration>, InletError> {
        queries::integrations::find(self.db()?, id).await
    }

    async fn create(
        &self,
        app_id: &str,
        page_ids: &[String],
    ) -> Result<Integration, InletError> {
        queries::integrations::create(self.db()?, app_id, page_ids).await
    }
}

#[async_trait]
impl ConversationStore for SqliteStorage {
    async fn find_by_key(
        &self,
        integration_id: &str,
        key: &ConversationKey,
    ) -> Result<Option<Conversation>, InletError> {
        queries::conversations::find_by_key(self.db()?, integration_id, key).await
    }

    async fn create(&self, conversation: NewConversation) -> Result<Conversation, InletError> {
        queries::conversations::create(self.db()?, conversation).await
    }

    async fn reopen(&self, id: &str) -> Result<Conversation, InletError> {
        queries::conversations::reopen(self.db()?, id).await
    }
}

#[async_trait]
impl CustomerStore for SqliteStorage {
    async fn find_by_external_id(
        &self,
        integration_id: &str,
        external_id: &str,
    ) -> Result<Option<Customer>, InletError> {
        queries::customers::find_by_external_id(self.db()?, integration_id, external_id).await
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, InletError> {
        queries::customers::create(self.db()?, customer).await
    }
}

#[async_trait]
impl MessageStore for SqliteStorage {
    async fn find_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Option<ConversationMessage>, InletError> {
        queries::messages::find_by_comment_id(self.db()?, comment_id).await
    }

    async fn create(&self, message: NewMessage) -> Result<ConversationMessage, InletError> {
        queries::messages::create(self.db()?, message).await
    }

    async fn set_comment_id(
        &self,
        message_id: &str,
        comment_id: &str,
    ) -> Result<(), InletError> {
        queries::messages::set_comment_id(self.db()?, message_id, comment_id).await
    }
}
