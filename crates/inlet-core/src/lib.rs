// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Inlet webhook ingestion engine.
//!
//! This crate provides the domain types, error types, and the trait seams
//! (stores, Graph API) that the ingestion core is written against. The
//! SQLite storage crate and the reqwest graph crate implement these traits;
//! tests substitute in-memory fakes.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{GraphError, InletError};
pub use traits::{ConversationStore, CustomerStore, GraphApi, IntegrationStore, MessageStore};
pub use types::{
    Attachment, Conversation, ConversationKey, ConversationMessage, ConversationStatus, Customer,
    FacebookConversationData, FacebookMessageData, Integration, NewConversation, NewCustomer,
    NewMessage, NormalizedEvent,
};
