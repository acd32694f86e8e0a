//! Shared test utilities for the storefront.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults and capturing notifications.

use crate::{
    core::{courier, florist, order, product},
    entities,
    errors::{Error, Result},
    notify::{MessageSender, Notifier},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::{Arc, Mutex};

/// Chat id used by `recording_notifier`.
pub const TEST_CHAT_ID: &str = "-100123";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Product input with sensible defaults.
///
/// # Defaults
/// * description: "Test bouquet"
/// * image: "test.jpg"
/// * not recommended
pub fn new_product(name: &str, price: f64) -> product::NewProduct {
    product::NewProduct {
        name: name.to_string(),
        price,
        description: "Test bouquet".to_string(),
        long_description: None,
        image: "test.jpg".to_string(),
        is_recommended: false,
    }
}

/// An unsaved product model, for tests of pure helpers.
pub fn product_model(name: &str, price: f64) -> entities::product::Model {
    let now = chrono::Utc::now();
    entities::product::Model {
        id: 0,
        name: name.to_string(),
        is_recommended: false,
        description: "Test bouquet".to_string(),
        long_description: None,
        price,
        image: "test.jpg".to_string(),
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

/// Creates a test product with the given price.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::product::Model> {
    product::create_product(db, new_product(name, price)).await
}

/// Creates a test courier with a valid phone number.
pub async fn create_test_courier(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::courier::Model> {
    courier::create_courier(db, name, "+7 (999) 000-00-00").await
}

/// Creates a test florist with valid contacts.
pub async fn create_test_florist(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::florist::Model> {
    let email = format!("{}@flowers.test", name.to_lowercase());
    florist::create_florist(db, name, "89990001122", &email).await
}

/// Order input with sensible defaults.
///
/// # Defaults
/// * customer: "Maria", "+79991234567", no email
/// * delivery: "Lenina 1", 2030-03-08, slot "14-16"
pub fn new_order(product_id: i64, quantity: i32) -> order::NewOrder {
    order::NewOrder {
        customer_name: "Maria".to_string(),
        customer_phone: "+79991234567".to_string(),
        customer_email: None,
        delivery_address: "Lenina 1".to_string(),
        delivery_date: chrono::NaiveDate::from_ymd_opt(2030, 3, 8).unwrap_or_default(),
        delivery_time: "14-16".to_string(),
        product_id,
        quantity,
        comment: None,
    }
}

/// Creates a `New` test order.
pub async fn create_test_order(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i32,
) -> Result<entities::order::Model> {
    order::create_order(db, new_order(product_id, quantity)).await
}

/// Transport that records messages instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    attempts: Mutex<usize>,
    fail: bool,
}

impl RecordingSender {
    /// A transport whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Successfully delivered `(chat_id, text)` pairs.
    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Number of delivery attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|a| *a).unwrap_or_default()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts += 1;
        }
        if self.fail {
            return Err(Error::Notification {
                message: "transport unavailable".to_string(),
            });
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((chat_id.to_string(), text.to_string()));
        }
        Ok(())
    }
}

/// A notifier posting into `TEST_CHAT_ID` through a fresh `RecordingSender`.
pub fn recording_notifier() -> (Arc<RecordingSender>, Notifier) {
    let sender = Arc::new(RecordingSender::default());
    let notifier = Notifier::new(sender.clone(), TEST_CHAT_ID);
    (sender, notifier)
}
