// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin HTTP surface built on axum.
//!
//! Three authenticated endpoints (sync trigger, full data export, stats) plus
//! an unauthenticated health probe. Authentication is a shared secret passed
//! as a `?key=` query parameter; with no secret configured every admin route
//! is rejected (fail-closed).

pub mod auth;
pub mod handlers;
pub mod server;

pub use server::{start_server, GatewayState, ServerConfig};
