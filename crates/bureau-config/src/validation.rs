// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for loaded configuration.

use thiserror::Error;

use crate::model::BureauConfig;

/// A single configuration problem found after deserialization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{section}.{key}: {message}")]
    Invalid {
        section: &'static str,
        key: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(section: &'static str, key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section,
            key,
            message: message.into(),
        }
    }
}

/// Validates cross-field constraints that serde cannot express.
///
/// Returns all problems at once rather than stopping at the first, so a
/// misconfigured deployment gets one actionable report.
pub fn validate_config(config: &BureauConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.limits.daily_limit == 0 {
        errors.push(ConfigError::invalid(
            "limits",
            "daily_limit",
            "must be at least 1",
        ));
    }

    if config.gateway.enabled && config.admin.secret.is_none() {
        errors.push(ConfigError::invalid(
            "admin",
            "secret",
            "required when gateway.enabled = true (endpoints fail closed without it)",
        ));
    }

    if let Some(ref secret) = config.admin.secret
        && secret.len() < 16
    {
        errors.push(ConfigError::invalid(
            "admin",
            "secret",
            "must be at least 16 characters",
        ));
    }

    if let Some(ref token) = config.telegram.bot_token
        && token.is_empty()
    {
        errors.push(ConfigError::invalid(
            "telegram",
            "bot_token",
            "cannot be empty (omit the key to disable Telegram)",
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Prints validation errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("bureau: config error: {err}");
    }
}
