// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core trait definitions, error types, and domain types for the Bureau bot.
//!
//! Every other crate in the workspace depends on this one. It holds the
//! [`ChatTransport`] and [`Store`] seams, the [`BureauError`] taxonomy, and
//! the row types persisted by the storage layer.

pub mod error;
pub mod ids;
pub mod traits;
pub mod types;

pub use error::BureauError;
pub use traits::{ChatTransport, Store};
