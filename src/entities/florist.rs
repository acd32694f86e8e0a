//! Florist entity - Staff member handling consultation requests.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Florist database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "florists")]
pub struct Model {
    /// Unique identifier for the florist
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Florist name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Contact email
    pub email: String,
}

/// Defines relationships between Florist and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One florist handles many consultation requests
    #[sea_orm(has_many = "super::consultation_request::Entity")]
    ConsultationRequests,
}

impl Related<super::consultation_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsultationRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
