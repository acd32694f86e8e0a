//! Catalog structure - occasions, flowers, compositions and storefront groupings.
//!
//! Products themselves are managed in `core::product`; this module manages what
//! hangs off them and the read-only views the storefront needs: bouquet
//! composition, related bouquets and the catalog grouped by primary occasion.

use crate::{
    core::{product::get_all_active_products, validation},
    entities::{
        Flower, Occasion, Product, ProductFlower, ProductOccasion, flower, occasion, product,
        product_flower, product_occasion,
    },
    errors::{Error, Result},
};
use sea_orm::{JoinType, PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*};
use serde::Serialize;
use std::collections::BTreeSet;

const OCCASION_NAME_MAX_CHARS: usize = 25;
const FLOWER_NAME_MAX_CHARS: usize = 100;

/// One line of a bouquet's composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionEntry {
    /// Flower name
    pub flower: String,
    /// Number of stems
    pub quantity: i32,
}

/// Products sharing the same primary occasion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccasionGroup {
    /// The primary occasion
    pub occasion: occasion::Model,
    /// Active products whose primary occasion this is
    pub products: Vec<product::Model>,
}

/// Creates a new occasion.
pub async fn create_occasion(db: &DatabaseConnection, name: &str) -> Result<occasion::Model> {
    let name = validation::require_text("name", name, OCCASION_NAME_MAX_CHARS)?;

    occasion::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Lists all occasions ordered by name.
pub async fn list_occasions(db: &DatabaseConnection) -> Result<Vec<occasion::Model>> {
    Occasion::find()
        .order_by_asc(occasion::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new flower kind; names are unique.
pub async fn create_flower(db: &DatabaseConnection, name: &str) -> Result<flower::Model> {
    let name = validation::require_text("name", name, FLOWER_NAME_MAX_CHARS)?;

    let existing = Flower::find()
        .filter(flower::Column::Name.eq(name.as_str()))
        .count(db)
        .await?;
    if existing > 0 {
        return Err(Error::validation(
            "name",
            format!("a flower named '{name}' already exists"),
        ));
    }

    flower::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Tags a product with an occasion.
///
/// Linking an already linked pair only updates its `is_primary` flag. Several
/// primary occasions per product are accepted; `primary_occasion` picks the first.
pub async fn link_occasion(
    db: &DatabaseConnection,
    product_id: i64,
    occasion_id: i64,
    is_primary: bool,
) -> Result<product_occasion::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    Occasion::find_by_id(occasion_id)
        .one(db)
        .await?
        .ok_or(Error::OccasionNotFound { id: occasion_id })?;

    let existing = ProductOccasion::find()
        .filter(product_occasion::Column::ProductId.eq(product_id))
        .filter(product_occasion::Column::OccasionId.eq(occasion_id))
        .one(db)
        .await?;

    if let Some(link) = existing {
        let mut link: product_occasion::ActiveModel = link.into();
        link.is_primary = Set(is_primary);
        return link.update(db).await.map_err(Into::into);
    }

    product_occasion::ActiveModel {
        product_id: Set(product_id),
        occasion_id: Set(occasion_id),
        is_primary: Set(is_primary),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Returns the product's main occasion, if any.
pub async fn primary_occasion(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<occasion::Model>> {
    let link = ProductOccasion::find()
        .filter(product_occasion::Column::ProductId.eq(product_id))
        .filter(product_occasion::Column::IsPrimary.eq(true))
        .order_by_asc(product_occasion::Column::Id)
        .one(db)
        .await?;

    match link {
        Some(link) => Occasion::find_by_id(link.occasion_id)
            .one(db)
            .await
            .map_err(Into::into),
        None => Ok(None),
    }
}

/// Lists the occasions a product is tagged with, ordered by name.
pub async fn occasions_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<occasion::Model>> {
    Occasion::find()
        .join(JoinType::InnerJoin, occasion::Relation::ProductOccasions.def())
        .filter(product_occasion::Column::ProductId.eq(product_id))
        .order_by_asc(occasion::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds `quantity` stems of a flower to a bouquet's composition.
pub async fn add_flower(
    db: &DatabaseConnection,
    product_id: i64,
    flower_id: i64,
    quantity: i32,
) -> Result<product_flower::Model> {
    let quantity = validation::validate_quantity(quantity)?;

    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    Flower::find_by_id(flower_id)
        .one(db)
        .await?
        .ok_or(Error::FlowerNotFound { id: flower_id })?;

    product_flower::ActiveModel {
        product_id: Set(product_id),
        flower_id: Set(flower_id),
        quantity: Set(quantity),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Returns a bouquet's composition in insertion order.
pub async fn composition(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<CompositionEntry>> {
    let rows = ProductFlower::find()
        .filter(product_flower::Column::ProductId.eq(product_id))
        .order_by_asc(product_flower::Column::Id)
        .find_also_related(Flower)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(entry, flower)| {
            flower.map(|f| CompositionEntry {
                flower: f.name,
                quantity: entry.quantity,
            })
        })
        .collect())
}

/// Renders a composition as a single line, e.g. `Rose - 5 pcs, Tulip - 3 pcs`.
#[must_use]
pub fn format_composition(entries: &[CompositionEntry]) -> String {
    if entries.is_empty() {
        return "Composition not specified".to_string();
    }
    entries
        .iter()
        .map(|e| format!("{} - {} pcs", e.flower, e.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Composition of a bouquet rendered for display.
pub async fn composition_display(db: &DatabaseConnection, product_id: i64) -> Result<String> {
    Ok(format_composition(&composition(db, product_id).await?))
}

/// Active products sharing at least one occasion with the given product,
/// the product itself included. Ordered by name.
pub async fn related_products(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<product::Model>> {
    let occasion_ids: Vec<i64> = ProductOccasion::find()
        .filter(product_occasion::Column::ProductId.eq(product_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.occasion_id)
        .collect();

    if occasion_ids.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: BTreeSet<i64> = ProductOccasion::find()
        .filter(product_occasion::Column::OccasionId.is_in(occasion_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.product_id)
        .collect();

    Product::find()
        .filter(product::Column::Id.is_in(product_ids))
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Groups products by primary occasion.
///
/// Occasions keep the given order and only those with at least one product are
/// returned. A product with several primary links appears in each group.
#[must_use]
pub fn group_by_primary(
    occasions: Vec<occasion::Model>,
    links: &[product_occasion::Model],
    products: &[product::Model],
) -> Vec<OccasionGroup> {
    occasions
        .into_iter()
        .filter_map(|occasion| {
            let members: Vec<product::Model> = products
                .iter()
                .filter(|p| {
                    links.iter().any(|l| {
                        l.is_primary && l.occasion_id == occasion.id && l.product_id == p.id
                    })
                })
                .cloned()
                .collect();
            (!members.is_empty()).then_some(OccasionGroup {
                occasion,
                products: members,
            })
        })
        .collect()
}

/// The active catalog grouped by primary occasion, occasions ordered by name.
pub async fn products_by_primary_occasion(db: &DatabaseConnection) -> Result<Vec<OccasionGroup>> {
    let occasions = list_occasions(db).await?;
    let links = ProductOccasion::find()
        .filter(product_occasion::Column::IsPrimary.eq(true))
        .all(db)
        .await?;
    let products = get_all_active_products(db).await?;

    Ok(group_by_primary(occasions, &links, &products))
}
