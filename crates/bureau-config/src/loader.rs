// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bureau.toml` > `~/.config/bureau/bureau.toml`
//! > `/etc/bureau/bureau.toml` with environment variable overrides via the
//! `BUREAU_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BureauConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bureau/bureau.toml` (system-wide)
/// 3. `~/.config/bureau/bureau.toml` (user XDG config)
/// 4. `./bureau.toml` (local directory)
/// 5. `BUREAU_*` environment variables
pub fn load_config() -> Result<BureauConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BureauConfig::default()))
        .merge(Toml::file("/etc/bureau/bureau.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bureau/bureau.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bureau.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BureauConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BureauConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BureauConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BureauConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BUREAU_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`. Only the leading section
/// name becomes a dot.
fn env_provider() -> Env {
    const SECTIONS: &[&str] = &["bot", "telegram", "admin", "storage", "gateway", "limits"];
    Env::prefixed("BUREAU_").map(|key| {
        let lower = key.as_str().to_ascii_lowercase();
        for section in SECTIONS {
            if let Some(rest) = lower.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
                return format!("{section}.{rest}").into();
            }
        }
        lower.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_config_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [bot]
            name = "deskbot"

            [limits]
            daily_limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.bot.name, "deskbot");
        assert_eq!(config.limits.daily_limit, 5);
        // Untouched sections keep defaults.
        assert_eq!(config.gateway.port, 8090);
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.bot.name, "bureau");
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(load_config_from_str("[bot\nname=").is_err());
    }
}
