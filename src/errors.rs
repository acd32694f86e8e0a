//! Unified error type for the storefront.
//!
//! Data-integrity errors (validation, missing references, business rules) abort the
//! operation and surface to the caller. Notification failures are reported through
//! `Error::Notification` by the transport only; the lifecycle code logs and drops them.

use thiserror::Error;

/// Every failure the storefront can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be loaded or are inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the settings
        message: String,
    },

    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A customer or staff input field was rejected
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        message: String,
    },

    /// Order quantity below one
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity {
        /// Requested quantity
        quantity: i32,
    },

    /// Non-positive or non-finite money amount
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Rejected amount
        amount: f64,
    },

    /// Delivery slot code outside the known set
    #[error("Unknown delivery time slot: '{value}'")]
    InvalidTimeSlot {
        /// Rejected slot code
        value: String,
    },

    /// No product with this id
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// No order with this id
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// No courier with this id
    #[error("Courier not found: {id}")]
    CourierNotFound {
        /// Requested courier id
        id: i64,
    },

    /// No florist with this id
    #[error("Florist not found: {id}")]
    FloristNotFound {
        /// Requested florist id
        id: i64,
    },

    /// No occasion with this id
    #[error("Occasion not found: {id}")]
    OccasionNotFound {
        /// Requested occasion id
        id: i64,
    },

    /// No flower with this id
    #[error("Flower not found: {id}")]
    FlowerNotFound {
        /// Requested flower id
        id: i64,
    },

    /// No consultation request with this id
    #[error("Consultation request not found: {id}")]
    ConsultationNotFound {
        /// Requested consultation id
        id: i64,
    },

    /// Too many products flagged as recommended
    #[error("No more than {limit} products can be recommended at the same time")]
    RecommendedLimit {
        /// Maximum number of recommended products
        limit: u64,
    },

    /// Product still referenced by orders
    #[error("Product {id} is referenced by {orders} order(s) and cannot be deleted")]
    ProductInUse {
        /// Product id
        id: i64,
        /// Number of orders pointing at it
        orders: u64,
    },

    /// Lifecycle step not allowed from the current status
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Staff chat message could not be delivered
    #[error("Notification delivery failed: {message}")]
    Notification {
        /// Transport error description
        message: String,
    },

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a field validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
