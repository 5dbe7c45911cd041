// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Bureau bot.

use thiserror::Error;

/// The primary error type used across all Bureau traits and core operations.
///
/// Every error is per-event: nothing in this taxonomy is fatal to the process.
#[derive(Debug, Error)]
pub enum BureauError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// User input failed validation (malformed email, empty required field).
    /// Reported to the user; the session step is left unchanged.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced record no longer exists (e.g. an admin replied to a
    /// ticket id that was never created).
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Chat transport errors (send/edit/delete/answer failed or timed out).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Row-store errors (connection, query failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A rate-limited action was denied. No state is mutated beyond what the
    /// limiter itself records.
    #[error("rate limit exceeded for {action}")]
    RateLimited { action: &'static str },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BureauError {
    /// Shorthand for a transport failure without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        BureauError::Transport {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_id() {
        let err = BureauError::NotFound {
            kind: "ticket",
            id: "TKT-1".into(),
        };
        assert_eq!(err.to_string(), "ticket not found: TKT-1");
    }

    #[test]
    fn rate_limited_names_the_action() {
        let err = BureauError::RateLimited { action: "ticket" };
        assert!(err.to_string().contains("ticket"));
    }
}
