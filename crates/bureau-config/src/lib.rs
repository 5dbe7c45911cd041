// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Bureau bot.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! let config = bureau_config::load_and_validate().expect("config errors");
//! println!("bot name: {}", config.bot.name);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BureauConfig;
pub use validation::{ConfigError, render_errors};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid [`BureauConfig`] or the full list of problems.
pub fn load_and_validate() -> Result<BureauConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Invalid {
            section: "toml",
            key: "parse",
            message: err.to_string(),
        }]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<BureauConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Invalid {
            section: "toml",
            key: "parse",
            message: err.to_string(),
        }]),
    }
}
