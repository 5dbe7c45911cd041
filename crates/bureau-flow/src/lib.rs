// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow engine for the Bureau bot.
//!
//! Houses the four subsystems the whole product hangs on:
//!
//! - the **flow router** mapping (current step, inbound event) to a handler,
//!   admin routes first ([`router`], [`engine`], [`flows`]);
//! - the **menu lifecycle manager** keeping at most one live interactive
//!   message per user ([`menu`]);
//! - the **sliding-window rate limiter** for ticket creation and email
//!   verification ([`limiter`]);
//! - the **notification dispatcher** behind broadcasts and ticket-answer
//!   delivery, plus the asynchronous sync scan ([`dispatcher`], [`sync`]).
//!
//! Event processing is serialized per identity through a keyed mutex
//! ([`locks`]), and record creation is guarded by an idempotency ledger
//! ([`dedup`]) so redelivered webhook events cannot double-submit.

pub mod content;
pub mod dedup;
pub mod dispatcher;
pub mod email;
pub mod engine;
pub mod flows;
pub mod limiter;
pub mod locks;
pub mod menu;
pub mod router;
pub mod stats;
pub mod sync;
pub mod tickets;

pub use engine::FlowEngine;
pub use sync::{SyncReport, SyncScan};
