//! Product entity - Represents a bouquet offered in the storefront catalog.
//!
//! Each product has a unique name, a fixed price, descriptive texts and an image
//! reference. Products are tagged with occasions through `product_occasion` and
//! composed of flowers through `product_flower`. At most three products may carry
//! the recommended flag at the same time; the limit is enforced by `core::product`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Bouquet name, unique across the catalog
    #[sea_orm(unique)]
    pub name: String,
    /// Whether the bouquet is shown on the storefront's front page
    pub is_recommended: bool,
    /// Short description shown on cards
    pub description: String,
    /// Longer description shown on the bouquet page
    pub long_description: Option<String>,
    /// Price per bouquet
    pub price: f64,
    /// Image reference (file name or URL)
    pub image: String,
    /// Soft delete flag - archived products cannot be ordered
    pub is_deleted: bool,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many occasion associations
    #[sea_orm(has_many = "super::product_occasion::Entity")]
    ProductOccasions,
    /// One product has many composition entries
    #[sea_orm(has_many = "super::product_flower::Entity")]
    Composition,
    /// One product is referenced by many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::product_occasion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductOccasions.def()
    }
}

impl Related<super::product_flower::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Composition.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::occasion::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_occasion::Relation::Occasion.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_occasion::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
