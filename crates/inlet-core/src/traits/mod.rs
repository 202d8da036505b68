// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the ingestion core and its external collaborators.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility, so
//! the resolvers can run against SQLite in production and in-memory fakes
//! in tests.

pub mod graph;
pub mod store;

pub use graph::GraphApi;
pub use store::{ConversationStore, CustomerStore, IntegrationStore, MessageStore};
