//! Product-occasion association entity.
//!
//! Links a product to an occasion and carries the `is_primary` flag used to group
//! the catalog by main occasion. One row exists per (product, occasion) pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Association database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_occasions")]
pub struct Model {
    /// Unique identifier for the association
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Linked product
    pub product_id: i64,
    /// Linked occasion
    pub occasion_id: i64,
    /// Whether this is the product's main occasion
    pub is_primary: bool,
}

/// Defines relationships between the association and its endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each association belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Each association belongs to one occasion
    #[sea_orm(
        belongs_to = "super::occasion::Entity",
        from = "Column::OccasionId",
        to = "super::occasion::Column::Id",
        on_delete = "Cascade"
    )]
    Occasion,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::occasion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Occasion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
