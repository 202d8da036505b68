// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway receiving platform webhook deliveries for Inlet.

pub mod handlers;
pub mod server;

pub use server::{router, start_server, GatewayState, ServerConfig};
