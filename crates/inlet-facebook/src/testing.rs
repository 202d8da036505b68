// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store and graph fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use inlet_core::types::{
    Conversation, ConversationKey, ConversationMessage, ConversationStatus, Customer,
    Integration, NewConversation, NewCustomer, NewMessage,
};
use inlet_core::{
    ConversationStore, CustomerStore, GraphApi, GraphError, InletError, IntegrationStore,
    MessageStore,
};

const TEST_TS: &str = "2026-03-01T00:00:00.000Z";

/// Backs all four store traits with plain vectors.
///
/// Mirrors the SQLite layer's uniqueness behavior: creates that collide
/// on a merge key or an external id return the existing row.
pub(crate) struct MemoryStore {
    next_id: AtomicU64,
    pub integrations: Mutex<Vec<Integration>>,
    pub conversations: Mutex<Vec<Conversation>>,
    pub customers: Mutex<Vec<Customer>>,
    pub messages: Mutex<Vec<ConversationMessage>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1),
            integrations: Mutex::new(Vec::new()),
            conversations: Mutex::new(Vec::new()),
            customers: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        })
    }

    fn next(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub fn add_integration(&self, app_id: &str, page_ids: &[&str]) -> Integration {
        let integration = Integration {
            id: self.next("int"),
            app_id: app_id.to_string(),
            page_ids: page_ids.iter().map(|p| p.to_string()).collect(),
            created_at: TEST_TS.to_string(),
        };
        self.integrations.lock().unwrap().push(integration.clone());
        integration
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn customer_count(&self) -> usize {
        self.customers.lock().unwrap().len()
    }
}

#[async_trait]
impl IntegrationStore for MemoryStore {
    async fn find_by_app_id(&self, app_id: &str) -> Result<Vec<Integration>, InletError> {
        Ok(self
            .integrations
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.app_id == app_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Integration>, InletError> {
        Ok(self
            .integrations
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn create(&self, app_id: &str, page_ids: &[String]) -> Result<Integration, InletError> {
        let refs: Vec<&str> = page_ids.iter().map(String::as_str).collect();
        Ok(self.add_integration(app_id, &refs))
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn find_by_key(
        &self,
        integration_id: &str,
        key: &ConversationKey,
    ) -> Result<Option<Conversation>, InletError> {
        let wanted = key.storage_key();
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.integration_id == integration_id && c.data.key().storage_key() == wanted)
            .cloned())
    }

    async fn create(&self, conversation: NewConversation) -> Result<Conversation, InletError> {
        let wanted = conversation.data.key().storage_key();
        let mut conversations = self.conversations.lock().unwrap();
        if let Some(existing) = conversations.iter().find(|c| {
            c.integration_id == conversation.integration_id
                && c.data.key().storage_key() == wanted
        }) {
            return Ok(existing.clone());
        }

        let created = Conversation {
            id: self.next("conv"),
            integration_id: conversation.integration_id,
            customer_id: conversation.customer_id,
            status: conversation.status,
            content: conversation.content,
            page_id: conversation.page_id,
            data: conversation.data,
            created_at: TEST_TS.to_string(),
            updated_at: TEST_TS.to_string(),
        };
        conversations.push(created.clone());
        Ok(created)
    }

    async fn reopen(&self, id: &str) -> Result<Conversation, InletError> {
        let mut conversations = self.conversations.lock().unwrap();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| InletError::NotFound {
                kind: "conversation",
                id: id.to_string(),
            })?;
        conversation.status = ConversationStatus::New;
        Ok(conversation.clone())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn find_by_external_id(
        &self,
        integration_id: &str,
        external_id: &str,
    ) -> Result<Option<Customer>, InletError> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.integration_id == integration_id && c.external_id == external_id)
            .cloned())
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, InletError> {
        let mut customers = self.customers.lock().unwrap();
        if let Some(existing) = customers.iter().find(|c| {
            c.integration_id == customer.integration_id && c.external_id == customer.external_id
        }) {
            return Ok(existing.clone());
        }

        let created = Customer {
            id: self.next("cus"),
            integration_id: customer.integration_id,
            name: customer.name,
            external_id: customer.external_id,
            profile_pic: customer.profile_pic,
            created_at: TEST_TS.to_string(),
        };
        customers.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn find_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Option<ConversationMessage>, InletError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.comment_id.as_deref() == Some(comment_id))
            .cloned())
    }

    async fn create(&self, message: NewMessage) -> Result<ConversationMessage, InletError> {
        let created = ConversationMessage {
            id: self.next("msg"),
            conversation_id: message.conversation_id,
            customer_id: message.customer_id,
            content: message.content,
            attachments: message.attachments,
            data: message.data,
            comment_id: message.comment_id,
            internal: message.internal,
            created_at: TEST_TS.to_string(),
        };
        self.messages.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn set_comment_id(&self, message_id: &str, comment_id: &str) -> Result<(), InletError> {
        let mut messages = self.messages.lock().unwrap();
        let message = messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| InletError::NotFound {
                kind: "message",
                id: message_id.to_string(),
            })?;
        message.comment_id = Some(comment_id.to_string());
        Ok(())
    }
}

/// One integration, one current page, fakes wired into a processor.
pub(crate) struct Harness {
    pub store: Arc<MemoryStore>,
    pub graph: Arc<MockGraph>,
    pub processor: crate::router::WebhookProcessor,
    pub integration: Integration,
    pub ctx: crate::router::PageContext,
}

pub(crate) fn harness(page_ids: &[&str], current_page: &str) -> Harness {
    let store = MemoryStore::new();
    let graph = MockGraph::new();
    let processor = crate::router::WebhookProcessor::new(
        store.clone(),
        store.clone(),
        store.clone(),
        graph.clone(),
    );
    let integration = store.add_integration("app-1", page_ids);
    let ctx = crate::router::PageContext {
        page_id: current_page.to_string(),
        app_access_token: "app-token".to_string(),
    };
    Harness {
        store,
        graph,
        processor,
        integration,
        ctx,
    }
}

enum Programmed {
    Value(Value),
    TokenExpired,
}

/// Scripted graph fake recording every call it receives.
pub(crate) struct MockGraph {
    routes: Mutex<HashMap<String, Programmed>>,
    pub get_calls: Mutex<Vec<String>>,
    pub post_calls: Mutex<Vec<(String, Value)>>,
    post_response: Mutex<Value>,
}

impl MockGraph {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(HashMap::new()),
            get_calls: Mutex::new(Vec::new()),
            post_calls: Mutex::new(Vec::new()),
            post_response: Mutex::new(json!({ "id": "comment-1" })),
        })
    }

    pub fn on_get(&self, path: &str, value: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Programmed::Value(value));
    }

    pub fn expire_token_on(&self, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Programmed::TokenExpired);
    }

    pub fn on_post_response(&self, value: Value) {
        *self.post_response.lock().unwrap() = value;
    }

    /// Standard happy-path script for a page: token mint, post lookup,
    /// and a profile for each listed user.
    pub fn script_page(&self, page_id: &str, post_id: &str, canonical_post_id: &str) {
        self.on_get(
            &format!("{page_id}?fields=access_token"),
            json!({ "access_token": "page-token" }),
        );
        self.on_get(post_id, json!({ "id": canonical_post_id }));
    }

    pub fn script_profile(&self, user_id: &str, profile: Value) {
        self.on_get(user_id, profile);
    }

    pub fn gets_matching(&self, path: &str) -> usize {
        self.get_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

#[async_trait]
impl GraphApi for MockGraph {
    async fn get(&self, path: &str, _access_token: &str) -> Result<Value, GraphError> {
        self.get_calls.lock().unwrap().push(path.to_string());
        match self.routes.lock().unwrap().get(path) {
            Some(Programmed::Value(value)) => Ok(value.clone()),
            Some(Programmed::TokenExpired) => Err(GraphError::TokenExpired),
            None => Err(GraphError::UnexpectedResponse(format!(
                "no scripted response for {path}"
            ))),
        }
    }

    async fn post(
        &self,
        path: &str,
        _access_token: &str,
        body: &Value,
    ) -> Result<Value, GraphError> {
        self.post_calls
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        Ok(self.post_response.lock().unwrap().clone())
    }
}
