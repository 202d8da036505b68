// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facebook Graph API client for the Inlet webhook ingestion service.

pub mod client;
pub mod types;

pub use client::GraphClient;
pub use types::PageInfo;
