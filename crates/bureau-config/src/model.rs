// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Bureau bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Bureau configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BureauConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Admin identity and secret settings.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Admin HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Rate limiting and dispatcher throughput settings.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "bureau".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram transport.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Admin identity configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Chat id of the admin identity. Admin-only routes and error alerts go
    /// here. `None` disables admin flows.
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Shared secret gating the admin HTTP surface (`?key=`).
    /// `None` fail-closes every gateway endpoint.
    #[serde(default)]
    pub secret: Option<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("bureau").join("bureau.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "bureau.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Admin HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Enable the admin HTTP surface.
    #[serde(default)]
    pub enabled: bool,

    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8090
}

/// Rate limiting and dispatcher throughput configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum limited actions (tickets, outbound emails) per 24h window.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Fixed delay between sequential deliveries in a dispatcher batch, in
    /// milliseconds. Keeps the transport under its throughput cap.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

fn default_daily_limit() -> u32 {
    3
}

fn default_batch_delay_ms() -> u64 {
    35
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = BureauConfig::default();
        assert_eq!(config.bot.name, "bureau");
        assert_eq!(config.limits.daily_limit, 3);
        assert!(config.storage.wal_mode);
        assert!(!config.gateway.enabled);
        assert!(config.admin.secret.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<BureauConfig, _> =
            toml::from_str("[bot]\nname = \"x\"\nno_such_key = 1\n");
        assert!(result.is_err());
    }
}
