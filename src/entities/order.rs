//! Order entity - A customer's bouquet purchase and its delivery lifecycle.
//!
//! Each order references one product, a quantity and delivery details. The
//! `total_price` and `delivered_at` columns are derived from the rest of the row
//! and are recomputed by `core::order` on every write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Lifecycle status of an order.
///
/// `New -> Paid -> Assigned -> Delivered`, or `Cancelled` from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, awaiting payment
    #[sea_orm(string_value = "new")]
    New,
    /// Payment confirmed
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Handed over to a courier
    #[sea_orm(string_value = "assigned")]
    Assigned,
    /// Delivered to the recipient
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Cancelled before delivery
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Storage/wire representation of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Paid => "paid",
            Self::Assigned => "assigned",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::New, Self::Paid)
            | (Self::Paid, Self::Assigned)
            | (Self::Assigned, Self::Delivered) => true,
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested delivery window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DeliverySlot {
    /// As soon as possible
    #[sea_orm(string_value = "any")]
    #[serde(rename = "any")]
    Any,
    /// 10:00 - 12:00
    #[sea_orm(string_value = "10-12")]
    #[serde(rename = "10-12")]
    From10To12,
    /// 12:00 - 14:00
    #[sea_orm(string_value = "12-14")]
    #[serde(rename = "12-14")]
    From12To14,
    /// 14:00 - 16:00
    #[sea_orm(string_value = "14-16")]
    #[serde(rename = "14-16")]
    From14To16,
    /// 16:00 - 18:00
    #[sea_orm(string_value = "16-18")]
    #[serde(rename = "16-18")]
    From16To18,
    /// 18:00 - 20:00
    #[sea_orm(string_value = "18-20")]
    #[serde(rename = "18-20")]
    From18To20,
}

impl DeliverySlot {
    /// Storage/wire code of the slot
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::From10To12 => "10-12",
            Self::From12To14 => "12-14",
            Self::From14To16 => "14-16",
            Self::From16To18 => "16-18",
            Self::From18To20 => "18-20",
        }
    }

    /// Human-readable label used in notifications
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "As soon as possible",
            Self::From10To12 => "10:00 - 12:00",
            Self::From12To14 => "12:00 - 14:00",
            Self::From14To16 => "14:00 - 16:00",
            Self::From16To18 => "16:00 - 18:00",
            Self::From18To20 => "18:00 - 20:00",
        }
    }
}

impl FromStr for DeliverySlot {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any" => Ok(Self::Any),
            "10-12" => Ok(Self::From10To12),
            "12-14" => Ok(Self::From12To14),
            "14-16" => Ok(Self::From14To16),
            "16-18" => Ok(Self::From16To18),
            "18-20" => Ok(Self::From18To20),
            other => Err(crate::errors::Error::InvalidTimeSlot {
                value: other.to_string(),
            }),
        }
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer name
    pub customer_name: String,
    /// Customer phone
    pub customer_phone: String,
    /// Optional customer email
    pub customer_email: Option<String>,
    /// Delivery address
    pub delivery_address: String,
    /// Delivery date
    pub delivery_date: Date,
    /// Delivery window
    pub delivery_time: DeliverySlot,
    /// Assigned courier, None while unassigned
    pub courier_id: Option<i64>,
    /// Free-text comment from the customer
    pub comment: String,
    /// Ordered bouquet
    pub product_id: i64,
    /// Number of bouquets, at least 1
    pub quantity: i32,
    /// `product.price * quantity` as of the last write
    pub total_price: f64,
    /// Lifecycle status
    pub status: OrderStatus,
    /// When the order was placed
    pub created_at: DateTimeUtc,
    /// Set while the status is `Delivered`
    pub delivered_at: Option<DateTimeUtc>,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order references one product; the product cannot be removed while referenced
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Restrict"
    )]
    Product,
    /// Each order may be held by one courier
    #[sea_orm(
        belongs_to = "super::courier::Entity",
        from = "Column::CourierId",
        to = "super::courier::Column::Id",
        on_delete = "SetNull"
    )]
    Courier,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::courier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Assigned));
        assert!(OrderStatus::Assigned.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Paid));
    }

    #[test]
    fn test_cancellation_only_from_open_states() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Assigned.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::New));
    }

    #[test]
    fn test_delivery_slot_parsing() {
        assert_eq!("any".parse::<DeliverySlot>().ok(), Some(DeliverySlot::Any));
        assert_eq!(
            "14-16".parse::<DeliverySlot>().ok(),
            Some(DeliverySlot::From14To16)
        );
        assert!(matches!(
            "9-11".parse::<DeliverySlot>(),
            Err(crate::errors::Error::InvalidTimeSlot { .. })
        ));
        assert_eq!(DeliverySlot::From18To20.label(), "18:00 - 20:00");
    }
}
