//! Flower entity - A single flower kind used in bouquet compositions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Flower database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flowers")]
pub struct Model {
    /// Unique identifier for the flower
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Flower name (e.g., "Rose"), unique
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between Flower and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One flower appears in many compositions
    #[sea_orm(has_many = "super::product_flower::Entity")]
    Compositions,
}

impl Related<super::product_flower::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compositions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
