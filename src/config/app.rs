//! Application settings loading from config.toml
//!
//! Non-secret settings live in a TOML file. Every section has defaults, so a
//! missing file or a missing section yields a working development setup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Notification gateway settings
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Payment stub settings
    #[serde(default)]
    pub payments: PaymentConfig,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the API binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Notification gateway settings
#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Base URL of the Telegram Bot API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Upper bound for one outbound call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl NotificationConfig {
    /// Outbound call timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Payment stub settings
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    /// Public identifier handed to the payment widget
    #[serde(default = "default_public_id")]
    pub public_id: String,
    /// Amount shown when the caller does not pass one
    #[serde(default = "default_amount")]
    pub default_amount: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            public_id: default_public_id(),
            default_amount: default_amount(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

fn default_public_id() -> String {
    "test_api_00000000000000000000001".to_string()
}

fn default_amount() -> String {
    "10.00".to_string()
}

/// Loads application settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses application settings from TOML text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `path`, falling back to defaults when the file does not exist.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!("No config file at {:?}, using defaults", path);
        Ok(AppConfig::default())
    }
}
