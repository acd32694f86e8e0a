//! Shared handler state.

use crate::{config::AppConfig, notify::Notifier};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Everything a handler needs, cloned per request.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
    /// Staff chat notifier
    pub notifier: Notifier,
    /// Application settings
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles the process-wide resources.
    #[must_use]
    pub fn new(db: DatabaseConnection, notifier: Notifier, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            notifier,
            config: Arc::new(config),
        }
    }
}
