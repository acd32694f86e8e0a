//! Product business logic - Handles all bouquet-related catalog operations.
//!
//! This module provides functions for creating, retrieving, updating and retiring
//! bouquets. It owns the recommended-products rule: at most `RECOMMENDED_LIMIT`
//! products may carry the flag at once, checked inside the write transaction.
//! Price changes never touch saved orders; an order's total only follows the
//! current price when that order is written again.

use crate::{
    core::validation,
    entities::{
        Order, Product, ProductFlower, ProductOccasion, order, product, product_flower,
        product_occasion,
    },
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Maximum number of products flagged as recommended at the same time.
pub const RECOMMENDED_LIMIT: u64 = 3;

const NAME_MAX_CHARS: usize = 50;

/// Input for `create_product`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Unique bouquet name
    pub name: String,
    /// Price per bouquet
    pub price: f64,
    /// Short description
    pub description: String,
    /// Optional long description
    #[serde(default)]
    pub long_description: Option<String>,
    /// Image reference
    pub image: String,
    /// Whether to flag the bouquet as recommended right away
    #[serde(default)]
    pub is_recommended: bool,
}

/// Retrieves all active (non-archived) products, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active products flagged as recommended, ordered by name.
pub async fn get_recommended_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsRecommended.eq(true))
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its exact name, returning None if not found.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, archived ones included.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a product that can still be ordered.
///
/// # Errors
/// Returns `ProductNotFound` if the product does not exist or is archived.
pub async fn get_orderable_product<C>(conn: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(conn)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Fails with `RecommendedLimit` if flagging one more product would exceed the limit.
///
/// `exclude_id` is the product being flagged; it never counts against itself.
pub async fn ensure_recommended_slot<C>(conn: &C, exclude_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Product::find().filter(product::Column::IsRecommended.eq(true));
    if let Some(id) = exclude_id {
        query = query.filter(product::Column::Id.ne(id));
    }

    let flagged = query.count(conn).await?;
    if flagged >= RECOMMENDED_LIMIT {
        return Err(Error::RecommendedLimit {
            limit: RECOMMENDED_LIMIT,
        });
    }
    Ok(())
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name is empty, too long or already taken
/// - The price is negative or not finite (NaN, infinity)
/// - The product is flagged recommended while the limit is reached
/// - The database insert operation fails
pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<product::Model> {
    let name = validation::require_text("name", &new.name, NAME_MAX_CHARS)?;
    let price = validation::validate_price(new.price)?;
    let description = validation::require_text("description", &new.description, usize::MAX)?;
    let long_description = new
        .long_description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let txn = db.begin().await?;

    let duplicate = Product::find()
        .filter(product::Column::Name.eq(name.as_str()))
        .count(&txn)
        .await?;
    if duplicate > 0 {
        return Err(Error::validation(
            "name",
            format!("a product named '{name}' already exists"),
        ));
    }

    if new.is_recommended {
        ensure_recommended_slot(&txn, None).await?;
    }

    let now = chrono::Utc::now();
    let product = product::ActiveModel {
        name: Set(name),
        is_recommended: Set(new.is_recommended),
        description: Set(description),
        long_description: Set(long_description),
        price: Set(price),
        image: Set(new.image.trim().to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = product.insert(&txn).await?;

    txn.commit().await?;
    tracing::info!(product_id = result.id, "Created product '{}'", result.name);
    Ok(result)
}

/// Changes a product's price.
///
/// Orders already saved keep the total computed at their last write.
pub async fn update_product_price(
    db: &DatabaseConnection,
    product_id: i64,
    new_price: f64,
) -> Result<product::Model> {
    let price = validation::validate_price(new_price)?;

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.price = Set(price);
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Sets or clears the recommended flag on a product.
///
/// # Errors
/// Returns `RecommendedLimit` when three other products are already flagged,
/// and `ProductNotFound` when the product is missing or archived.
pub async fn set_recommended(
    db: &DatabaseConnection,
    product_id: i64,
    recommended: bool,
) -> Result<product::Model> {
    let txn = db.begin().await?;

    let current = get_orderable_product(&txn, product_id).await?;
    if recommended {
        ensure_recommended_slot(&txn, Some(product_id)).await?;
    }

    let mut product: product::ActiveModel = current.into();
    product.is_recommended = Set(recommended);
    product.updated_at = Set(chrono::Utc::now());
    let result = product.update(&txn).await?;

    txn.commit().await?;
    Ok(result)
}

/// Soft deletes a product: it disappears from listings and can no longer be
/// ordered, while orders referencing it stay intact.
///
/// # Errors
/// Returns `ProductNotFound` if the product does not exist or is already archived.
pub async fn archive_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let current = get_orderable_product(db, product_id).await?;

    let mut product: product::ActiveModel = current.into();
    product.is_deleted = Set(true);
    product.is_recommended = Set(false);
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Permanently deletes a product together with its occasion links and composition.
///
/// # Errors
/// Returns `ProductInUse` while any order references the product.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let orders = Order::find()
        .filter(order::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    if orders > 0 {
        return Err(Error::ProductInUse {
            id: product_id,
            orders,
        });
    }

    ProductOccasion::delete_many()
        .filter(product_occasion::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    ProductFlower::delete_many()
        .filter(product_flower::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    Product::delete_by_id(product_id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(product_id, "Deleted product");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Test empty name validation
        let result = create_product(&db, new_product("  ", 10.0)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { field: "name", .. }));

        // Test negative price validation
        let result = create_product(&db, new_product("Spring", -10.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -10.0 }
        ));

        // Test NaN price validation
        let result = create_product(&db, new_product("Spring", f64::NAN)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, new_product("Spring Mood", 1500.0)).await?;

        assert_eq!(product.name, "Spring Mood");
        assert_eq!(product.price, 1500.0);
        assert!(!product.is_recommended);
        assert!(!product.is_deleted);

        let found = get_product_by_name(&db, "Spring Mood").await?;
        assert_eq!(found.map(|p| p.id), Some(product.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_rejects_duplicate_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Spring", 1000.0).await?;

        let result = create_product(&db, new_product("Spring", 2000.0)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { field: "name", .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_recommended_limit_allows_third_rejects_fourth() -> Result<()> {
        let db = setup_test_db().await?;
        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D"] {
            ids.push(create_test_product(&db, name, 1000.0).await?.id);
        }

        set_recommended(&db, ids[0], true).await?;
        set_recommended(&db, ids[1], true).await?;
        // Flagging the third succeeds
        let third = set_recommended(&db, ids[2], true).await?;
        assert!(third.is_recommended);

        // Flagging a fourth is rejected and leaves the product unflagged
        let result = set_recommended(&db, ids[3], true).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::RecommendedLimit { limit: 3 }
        ));
        let fourth = get_product_by_id(&db, ids[3]).await?.unwrap();
        assert!(!fourth.is_recommended);

        // Re-flagging an already flagged product does not count against itself
        set_recommended(&db, ids[0], true).await?;

        // Freeing a slot makes room again
        set_recommended(&db, ids[1], false).await?;
        set_recommended(&db, ids[3], true).await?;
        assert_eq!(get_recommended_products(&db).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_recommended_product_respects_limit() -> Result<()> {
        let db = setup_test_db().await?;
        for name in ["A", "B", "C"] {
            let mut input = new_product(name, 500.0);
            input.is_recommended = true;
            create_product(&db, input).await?;
        }

        let mut fourth = new_product("D", 500.0);
        fourth.is_recommended = true;
        let result = create_product(&db, fourth).await;
        assert!(matches!(result.unwrap_err(), Error::RecommendedLimit { .. }));
        assert!(get_product_by_name(&db, "D").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_archive_product_hides_it() -> Result<()> {
        let db = setup_test_db().await?;
        let active = create_test_product(&db, "Active", 1000.0).await?;
        let archived = create_test_product(&db, "Archived", 1000.0).await?;
        set_recommended(&db, archived.id, true).await?;

        let result = archive_product(&db, archived.id).await?;
        assert!(result.is_deleted);
        assert!(!result.is_recommended);

        let products = get_all_active_products(&db).await?;
        assert_eq!(products, vec![active]);
        assert!(get_recommended_products(&db).await?.is_empty());

        // Archived products cannot be ordered or archived twice
        assert!(matches!(
            get_orderable_product(&db, archived.id).await.unwrap_err(),
            Error::ProductNotFound { .. }
        ));
        assert!(archive_product(&db, archived.id).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_blocked_by_orders() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Ordered", 1000.0).await?;
        create_test_order(&db, product.id, 1).await?;

        let result = delete_product(&db, product.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductInUse { orders: 1, .. }
        ));
        assert!(get_product_by_id(&db, product.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unreferenced_product() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Lonely", 1000.0).await?;
        let occasion = crate::core::catalog::create_occasion(&db, "Birthday").await?;
        crate::core::catalog::link_occasion(&db, product.id, occasion.id, true).await?;

        delete_product(&db, product.id).await?;

        assert!(get_product_by_id(&db, product.id).await?.is_none());
        assert!(
            crate::core::catalog::primary_occasion(&db, product.id)
                .await?
                .is_none()
        );
        assert!(matches!(
            delete_product(&db, product.id).await.unwrap_err(),
            Error::ProductNotFound { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_price() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Tulips", 800.0).await?;

        let updated = update_product_price(&db, product.id, 950.0).await?;
        assert_eq!(updated.price, 950.0);

        assert!(matches!(
            update_product_price(&db, product.id, -1.0).await.unwrap_err(),
            Error::InvalidAmount { .. }
        ));
        assert!(matches!(
            update_product_price(&db, 999, 1.0).await.unwrap_err(),
            Error::ProductNotFound { id: 999 }
        ));

        Ok(())
    }
}
