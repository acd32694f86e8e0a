//! Occasion entity - A tag a bouquet is suited for (birthday, anniversary, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occasion database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "occasions")]
pub struct Model {
    /// Unique identifier for the occasion
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the occasion
    pub name: String,
}

/// Defines relationships between Occasion and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One occasion is linked to many products
    #[sea_orm(has_many = "super::product_occasion::Entity")]
    ProductOccasions,
}

impl Related<super::product_occasion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductOccasions.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_occasion::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_occasion::Relation::Occasion.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
