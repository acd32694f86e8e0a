//! Courier business logic - the courier pool and least-loaded assignment.
//!
//! A courier's load is the number of orders referencing it, whatever their
//! status. The least-loaded courier wins; ties go to the lowest id so the choice
//! is reproducible. Load is read and written without row locks, which makes the
//! balancing approximate under concurrent payments.

use crate::{
    core::validation,
    entities::{Courier, courier, order},
    errors::{Error, Result},
};
use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect, Set, prelude::*, sea_query::Expr,
};
use serde::Serialize;

const NAME_MAX_CHARS: usize = 100;

/// A courier together with the number of orders it currently holds.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct CourierLoad {
    /// Courier id
    pub id: i64,
    /// Courier name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// Orders assigned to the courier
    pub order_count: i64,
}

impl From<CourierLoad> for courier::Model {
    fn from(load: CourierLoad) -> Self {
        Self {
            id: load.id,
            name: load.name,
            phone: load.phone,
        }
    }
}

/// Adds a courier to the pool.
pub async fn create_courier(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
) -> Result<courier::Model> {
    let name = validation::require_text("name", name, NAME_MAX_CHARS)?;
    let phone = validation::validate_phone(phone)?;

    let courier = courier::ActiveModel {
        name: Set(name),
        phone: Set(phone),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(courier_id = courier.id, "Courier '{}' added to the pool", courier.name);
    Ok(courier)
}

/// Looks up a courier by id.
pub async fn get_courier_by_id(
    db: &DatabaseConnection,
    courier_id: i64,
) -> Result<Option<courier::Model>> {
    Courier::find_by_id(courier_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the courier pool ordered by id.
pub async fn list_couriers(db: &DatabaseConnection) -> Result<Vec<courier::Model>> {
    Courier::find()
        .order_by_asc(courier::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every courier with its order count, ordered by id.
pub async fn courier_loads<C>(conn: &C) -> Result<Vec<CourierLoad>>
where
    C: ConnectionTrait,
{
    Courier::find()
        .select_only()
        .column(courier::Column::Id)
        .column(courier::Column::Name)
        .column(courier::Column::Phone)
        .column_as(
            Expr::col((order::Entity, order::Column::Id)).count(),
            "order_count",
        )
        .join(JoinType::LeftJoin, courier::Relation::Orders.def())
        .group_by(courier::Column::Id)
        .group_by(courier::Column::Name)
        .group_by(courier::Column::Phone)
        .order_by_asc(courier::Column::Id)
        .into_model::<CourierLoad>()
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Picks the courier with the fewest orders, lowest id on ties.
#[must_use]
pub fn select_least_loaded(loads: &[CourierLoad]) -> Option<&CourierLoad> {
    loads.iter().min_by_key(|load| (load.order_count, load.id))
}

/// Finds the least-loaded courier, or None when the pool is empty.
pub async fn find_least_loaded_courier<C>(conn: &C) -> Result<Option<courier::Model>>
where
    C: ConnectionTrait,
{
    let loads = courier_loads(conn).await?;
    let selected = select_least_loaded(&loads).cloned();

    match &selected {
        Some(load) => tracing::debug!(
            courier_id = load.id,
            order_count = load.order_count,
            "Selected least-loaded courier"
        ),
        None => tracing::debug!("Courier pool is empty"),
    }
    Ok(selected.map(Into::into))
}

/// Like `get_courier_by_id`, but a missing courier is an error.
pub async fn require_courier<C>(conn: &C, courier_id: i64) -> Result<courier::Model>
where
    C: ConnectionTrait,
{
    Courier::find_by_id(courier_id)
        .one(conn)
        .await?
        .ok_or(Error::CourierNotFound { id: courier_id })
}
