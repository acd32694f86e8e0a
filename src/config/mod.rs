/// Application settings loaded from config.toml
pub mod app;

/// Database configuration and connection management
pub mod database;

/// Telegram credentials from environment variables
pub mod secrets;

pub use app::{AppConfig, load_config_or_default};
