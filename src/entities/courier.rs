//! Courier entity - A delivery person orders are dispatched to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Courier database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "couriers")]
pub struct Model {
    /// Unique identifier; also the tie-break order for assignment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Courier name
    pub name: String,
    /// Contact phone
    pub phone: String,
}

/// Defines relationships between Courier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One courier holds many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
