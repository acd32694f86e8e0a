//! Consultation request entity - A customer's request to be called back by a florist.
//!
//! `processed_at` follows the florist assignment: it is stamped once when a florist
//! is first assigned and cleared when the assignment is removed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a consultation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Just received
    #[sea_orm(string_value = "new")]
    New,
    /// Staff has been notified
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Consultation finished
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl RequestStatus {
    /// Storage/wire representation of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// Consultation request database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consultation_requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer name
    pub customer_name: String,
    /// Customer phone
    pub customer_phone: String,
    /// Free-text comment, possibly composed from quiz answers
    pub comment: String,
    /// Lifecycle status
    pub status: RequestStatus,
    /// Florist handling the request
    pub florist_id: Option<i64>,
    /// When the request was received
    pub created_at: DateTimeUtc,
    /// When a florist was first assigned
    pub processed_at: Option<DateTimeUtc>,
}

impl Model {
    /// A request counts as processed once it left `New` and has a florist.
    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.status != RequestStatus::New && self.florist_id.is_some()
    }
}

/// Defines relationships between a request and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each request may be handled by one florist
    #[sea_orm(
        belongs_to = "super::florist::Entity",
        from = "Column::FloristId",
        to = "super::florist::Column::Id",
        on_delete = "SetNull"
    )]
    Florist,
}

impl Related<super::florist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Florist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
