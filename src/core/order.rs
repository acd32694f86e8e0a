//! Order business logic - placement, payment, dispatch and delivery.
//!
//! Orders follow `New -> Paid -> Assigned -> Delivered`, with `Cancelled`
//! reachable from every non-terminal status. Payment confirmation and handing the
//! order to a courier are one business event: `mark_paid` passes through `Paid`
//! and commits `Assigned` in the same transaction, so `Paid` is never stored.
//!
//! Every write goes through `save_order`, which recomputes the derived columns:
//! `total_price` from the product's current price and `delivered_at` from the
//! status. The courier notification is sent after the transaction commits and
//! its failure never undoes the payment.

use crate::{
    core::{courier, product::get_orderable_product, validation},
    entities::{
        DeliverySlot, Order, OrderStatus, Product, courier as courier_entity, order, product,
    },
    errors::{Error, Result},
    notify::{Notifier, messages},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue::Unchanged, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

const CUSTOMER_NAME_MAX_CHARS: usize = 50;

/// Input for `create_order`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    /// Customer name
    pub customer_name: String,
    /// Contact phone
    pub customer_phone: String,
    /// Optional contact email
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Where to deliver
    pub delivery_address: String,
    /// Delivery day
    pub delivery_date: NaiveDate,
    /// Slot code: `any`, `10-12`, `12-14`, `14-16`, `16-18` or `18-20`
    pub delivery_time: String,
    /// Ordered bouquet
    pub product_id: i64,
    /// Number of bouquets, at least one
    pub quantity: i32,
    /// Free-form note from the customer
    #[serde(default)]
    pub comment: Option<String>,
}

/// `price * quantity`
#[must_use]
pub fn calculate_total_price(price: f64, quantity: i32) -> f64 {
    price * f64::from(quantity)
}

/// Delivery timestamp implied by a status: kept or stamped while delivered,
/// cleared otherwise.
#[must_use]
pub fn derive_delivered_at(
    status: OrderStatus,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        OrderStatus::Delivered => current.or(Some(now)),
        _ => None,
    }
}

fn ensure_transition(from: OrderStatus, to: OrderStatus) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

async fn load_order<C>(conn: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id)
        .one(conn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })
}

/// Writes every column of `order`, recomputing the derived ones first.
///
/// Returns the stored row and the product it references.
async fn save_order<C>(conn: &C, order: order::Model) -> Result<(order::Model, product::Model)>
where
    C: ConnectionTrait,
{
    // Archived products keep their orders editable
    let product = Product::find_by_id(order.product_id)
        .one(conn)
        .await?
        .ok_or(Error::ProductNotFound {
            id: order.product_id,
        })?;

    let active = order::ActiveModel {
        id: Unchanged(order.id),
        customer_name: Set(order.customer_name),
        customer_phone: Set(order.customer_phone),
        customer_email: Set(order.customer_email),
        delivery_address: Set(order.delivery_address),
        delivery_date: Set(order.delivery_date),
        delivery_time: Set(order.delivery_time),
        courier_id: Set(order.courier_id),
        comment: Set(order.comment),
        product_id: Set(order.product_id),
        quantity: Set(order.quantity),
        total_price: Set(calculate_total_price(product.price, order.quantity)),
        status: Set(order.status),
        created_at: Set(order.created_at),
        delivered_at: Set(derive_delivered_at(
            order.status,
            order.delivered_at,
            Utc::now(),
        )),
    };

    Ok((active.update(conn).await?, product))
}

/// Places a new order awaiting payment.
///
/// # Errors
/// Returns an error if:
/// - A required customer or delivery field is blank, or the phone/email is malformed
/// - The quantity is below 1
/// - The delivery slot is not one of the known codes
/// - The product does not exist or is archived
pub async fn create_order(db: &DatabaseConnection, new: NewOrder) -> Result<order::Model> {
    let customer_name =
        validation::require_text("customer_name", &new.customer_name, CUSTOMER_NAME_MAX_CHARS)?;
    let customer_phone = validation::validate_phone(&new.customer_phone)?;
    let customer_email = validation::validate_optional_email(new.customer_email.as_deref())?;
    let delivery_address =
        validation::require_text("delivery_address", &new.delivery_address, usize::MAX)?;
    let delivery_time: DeliverySlot = new.delivery_time.parse()?;
    let quantity = validation::validate_quantity(new.quantity)?;
    let comment = new.comment.map(|c| c.trim().to_string()).unwrap_or_default();

    let txn = db.begin().await?;

    let product = get_orderable_product(&txn, new.product_id).await?;

    let order = order::ActiveModel {
        customer_name: Set(customer_name),
        customer_phone: Set(customer_phone),
        customer_email: Set(customer_email),
        delivery_address: Set(delivery_address),
        delivery_date: Set(new.delivery_date),
        delivery_time: Set(delivery_time),
        courier_id: Set(None),
        comment: Set(comment),
        product_id: Set(product.id),
        quantity: Set(quantity),
        total_price: Set(calculate_total_price(product.price, quantity)),
        status: Set(OrderStatus::New),
        created_at: Set(Utc::now()),
        delivered_at: Set(None),
        ..Default::default()
    };
    let result = order.insert(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        order_id = result.id,
        product_id = result.product_id,
        total = result.total_price,
        "Order placed"
    );
    Ok(result)
}

/// Looks up an order by id.
pub async fn get_order_by_id(db: &DatabaseConnection, order_id: i64) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All orders, newest first.
pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<order::Model>> {
    Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Orders held by one courier, newest first.
pub async fn list_orders_for_courier(
    db: &DatabaseConnection,
    courier_id: i64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::CourierId.eq(courier_id))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Confirms payment and dispatches the order.
///
/// An order without a courier gets the least-loaded one; with an empty pool it
/// stays unassigned. The stored status afterwards is `Assigned`. One delivery
/// notification is sent once the change is committed.
///
/// # Errors
/// Returns `OrderNotFound` for an unknown id and `InvalidTransition` unless the
/// order is `New`.
pub async fn mark_paid(
    db: &DatabaseConnection,
    notifier: &Notifier,
    order_id: i64,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let mut order = load_order(&txn, order_id).await?;
    ensure_transition(order.status, OrderStatus::Paid)?;

    let assigned: Option<courier_entity::Model> = match order.courier_id {
        Some(id) => Some(courier::require_courier(&txn, id).await?),
        None => courier::find_least_loaded_courier(&txn).await?,
    };
    if assigned.is_none() {
        tracing::warn!(order_id, "No couriers available, order stays unassigned");
    }
    order.courier_id = assigned.as_ref().map(|c| c.id);

    order.status = OrderStatus::Paid;
    ensure_transition(order.status, OrderStatus::Assigned)?;
    order.status = OrderStatus::Assigned;

    let (saved, product) = save_order(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(
        order_id,
        courier_id = ?saved.courier_id,
        "Order paid and handed over for delivery"
    );

    let text = messages::delivery_assignment(
        &saved,
        &product.name,
        assigned.as_ref().map(|c| c.name.as_str()),
    );
    notifier.notify(&text).await;

    Ok(saved)
}

/// Cancels an order that has not reached a terminal status.
pub async fn cancel_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let txn = db.begin().await?;

    let mut order = load_order(&txn, order_id).await?;
    ensure_transition(order.status, OrderStatus::Cancelled)?;
    order.status = OrderStatus::Cancelled;

    let (saved, _) = save_order(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(order_id, "Order cancelled");
    Ok(saved)
}

/// Marks an assigned order as delivered and stamps `delivered_at`.
pub async fn mark_delivered(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let txn = db.begin().await?;

    let mut order = load_order(&txn, order_id).await?;
    ensure_transition(order.status, OrderStatus::Delivered)?;
    order.status = OrderStatus::Delivered;

    let (saved, _) = save_order(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(order_id, "Order delivered");
    Ok(saved)
}

/// Hands an open order to a specific courier, overriding automatic assignment.
pub async fn assign_courier(
    db: &DatabaseConnection,
    order_id: i64,
    courier_id: i64,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let mut order = load_order(&txn, order_id).await?;
    if order.status.is_terminal() {
        return Err(Error::InvalidTransition {
            from: order.status.to_string(),
            to: "courier reassignment".to_string(),
        });
    }
    let courier = courier::require_courier(&txn, courier_id).await?;
    order.courier_id = Some(courier.id);

    let (saved, _) = save_order(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(order_id, courier_id, "Courier assigned manually");
    Ok(saved)
}

/// Changes the quantity of an unpaid order. The total follows the product's
/// current price.
pub async fn change_quantity(
    db: &DatabaseConnection,
    order_id: i64,
    quantity: i32,
) -> Result<order::Model> {
    let quantity = validation::validate_quantity(quantity)?;

    let txn = db.begin().await?;

    let mut order = load_order(&txn, order_id).await?;
    if order.status != OrderStatus::New {
        return Err(Error::InvalidTransition {
            from: order.status.to_string(),
            to: "quantity change".to_string(),
        });
    }
    order.quantity = quantity;

    let (saved, _) = save_order(&txn, order).await?;
    txn.commit().await?;
    Ok(saved)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::product::{archive_product, update_product_price},
        test_utils::*,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.005,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_calculate_total_price() {
        assert_close(calculate_total_price(1500.0, 2), 3000.0);
        assert_close(calculate_total_price(999.99, 3), 2999.97);
    }

    #[test]
    fn test_derive_delivered_at() {
        let earlier = Utc::now() - chrono::Duration::hours(1);
        let now = Utc::now();

        assert_eq!(derive_delivered_at(OrderStatus::Delivered, None, now), Some(now));
        assert_eq!(
            derive_delivered_at(OrderStatus::Delivered, Some(earlier), now),
            Some(earlier)
        );
        assert_eq!(derive_delivered_at(OrderStatus::Assigned, Some(earlier), now), None);
        assert_eq!(derive_delivered_at(OrderStatus::Cancelled, None, now), None);
    }

    #[tokio::test]
    async fn test_create_order_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = new_order(1, 0);
        let result = create_order(&db, input.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidQuantity { quantity: 0 }));

        input.quantity = 1;
        input.delivery_time = "9-11".to_string();
        let result = create_order(&db, input.clone()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidTimeSlot { .. }));

        input.delivery_time = "any".to_string();
        input.customer_name = " ".to_string();
        let result = create_order(&db, input.clone()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "customer_name", .. }
        ));

        input.customer_name = "Maria".to_string();
        input.customer_phone = "call me".to_string();
        let result = create_order(&db, input).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { field: "phone", .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_computes_total() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1500.0).await?;

        let order = create_order(&db, new_order(product.id, 2)).await?;

        assert_eq!(order.status, OrderStatus::New);
        assert_close(order.total_price, 3000.0);
        assert!(order.courier_id.is_none());
        assert!(order.delivered_at.is_none());
        assert_eq!(order.delivery_time, DeliverySlot::From14To16);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_missing_or_archived_product() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Old", 1000.0).await?;
        archive_product(&db, product.id).await?;

        assert!(matches!(
            create_order(&db, new_order(product.id, 1)).await.unwrap_err(),
            Error::ProductNotFound { .. }
        ));
        assert!(matches!(
            create_order(&db, new_order(999, 1)).await.unwrap_err(),
            Error::ProductNotFound { id: 999 }
        ));
        assert!(list_orders(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_assigns_least_loaded_and_notifies_once() -> Result<()> {
        let db = setup_test_db().await?;
        let (sender, notifier) = recording_notifier();
        let product = create_test_product(&db, "Roses", 1500.0).await?;

        let busy = create_test_courier(&db, "Busy").await?;
        let idle = create_test_courier(&db, "Idle").await?;
        let earlier = create_test_order(&db, product.id, 1).await?;
        assign_courier(&db, earlier.id, busy.id).await?;

        let order = create_test_order(&db, product.id, 2).await?;
        let paid = mark_paid(&db, &notifier, order.id).await?;

        assert_eq!(paid.status, OrderStatus::Assigned);
        assert_eq!(paid.courier_id, Some(idle.id));
        assert_close(paid.total_price, 3000.0);

        let stored = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(stored.status, OrderStatus::Assigned);

        let sent = sender.messages();
        assert_eq!(sent.len(), 1);
        let (chat_id, text) = &sent[0];
        assert_eq!(chat_id, TEST_CHAT_ID);
        assert!(text.contains("Courier: Idle"));
        assert!(text.contains("Product: Roses × 2"));
        assert!(text.contains("Total: 3000.00 RUB"));
        assert!(text.contains("14:00 - 16:00"));

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_ties_go_to_first_courier() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let first = create_test_courier(&db, "First").await?;
        create_test_courier(&db, "Second").await?;

        let order = create_test_order(&db, product.id, 1).await?;
        let paid = mark_paid(&db, &Notifier::disabled(), order.id).await?;
        assert_eq!(paid.courier_id, Some(first.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_keeps_preassigned_courier() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        create_test_courier(&db, "Idle").await?;
        let chosen = create_test_courier(&db, "Chosen").await?;

        let order = create_test_order(&db, product.id, 1).await?;
        assign_courier(&db, order.id, chosen.id).await?;

        let paid = mark_paid(&db, &Notifier::disabled(), order.id).await?;
        assert_eq!(paid.courier_id, Some(chosen.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_with_empty_courier_pool() -> Result<()> {
        let db = setup_test_db().await?;
        let (sender, notifier) = recording_notifier();
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let order = create_test_order(&db, product.id, 1).await?;

        let paid = mark_paid(&db, &notifier, order.id).await?;

        assert_eq!(paid.status, OrderStatus::Assigned);
        assert!(paid.courier_id.is_none());
        let sent = sender.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("Courier: not assigned"));

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_survives_notification_failure() -> Result<()> {
        let db = setup_test_db().await?;
        let sender = std::sync::Arc::new(RecordingSender::failing());
        let notifier = Notifier::new(sender.clone(), TEST_CHAT_ID);
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let order = create_test_order(&db, product.id, 1).await?;

        let paid = mark_paid(&db, &notifier, order.id).await?;

        assert_eq!(paid.status, OrderStatus::Assigned);
        assert_eq!(sender.attempts(), 1);
        let stored = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(stored.status, OrderStatus::Assigned);

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_twice_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let (sender, notifier) = recording_notifier();
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let order = create_test_order(&db, product.id, 1).await?;

        mark_paid(&db, &notifier, order.id).await?;
        let result = mark_paid(&db, &notifier, order.id).await;

        assert!(matches!(result.unwrap_err(), Error::InvalidTransition { .. }));
        assert_eq!(sender.messages().len(), 1);
        assert!(matches!(
            mark_paid(&db, &notifier, 999).await.unwrap_err(),
            Error::OrderNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let order = create_test_order(&db, product.id, 1).await?;

        // Delivery requires a dispatched order
        assert!(matches!(
            mark_delivered(&db, order.id).await.unwrap_err(),
            Error::InvalidTransition { .. }
        ));

        mark_paid(&db, &Notifier::disabled(), order.id).await?;
        let delivered = mark_delivered(&db, order.id).await?;
        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert!(delivered.delivered_at.is_some());

        // Delivered is terminal
        assert!(matches!(
            cancel_order(&db, order.id).await.unwrap_err(),
            Error::InvalidTransition { .. }
        ));
        let stored = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(stored.status, OrderStatus::Delivered);
        assert!(stored.delivered_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_from_open_states() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;

        let fresh = create_test_order(&db, product.id, 1).await?;
        let cancelled = cancel_order(&db, fresh.id).await?;
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(cancelled.delivered_at.is_none());

        let dispatched = create_test_order(&db, product.id, 1).await?;
        mark_paid(&db, &Notifier::disabled(), dispatched.id).await?;
        assert_eq!(
            cancel_order(&db, dispatched.id).await?.status,
            OrderStatus::Cancelled
        );

        // Cancelled is terminal
        assert!(cancel_order(&db, fresh.id).await.is_err());
        assert!(mark_paid(&db, &Notifier::disabled(), fresh.id).await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_price_change_applies_on_next_save_only() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let order = create_test_order(&db, product.id, 2).await?;

        update_product_price(&db, product.id, 1200.0).await?;

        // Saved orders keep the old total until written again
        let stored = get_order_by_id(&db, order.id).await?.unwrap();
        assert_close(stored.total_price, 2000.0);

        let changed = change_quantity(&db, order.id, 3).await?;
        assert_eq!(changed.quantity, 3);
        assert_close(changed.total_price, 3600.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_change_quantity_rules() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let order = create_test_order(&db, product.id, 1).await?;

        assert!(matches!(
            change_quantity(&db, order.id, 0).await.unwrap_err(),
            Error::InvalidQuantity { quantity: 0 }
        ));

        mark_paid(&db, &Notifier::disabled(), order.id).await?;
        assert!(matches!(
            change_quantity(&db, order.id, 2).await.unwrap_err(),
            Error::InvalidTransition { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_assign_courier_rules() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let courier = create_test_courier(&db, "Ivan").await?;
        let order = create_test_order(&db, product.id, 1).await?;

        assert!(matches!(
            assign_courier(&db, order.id, 999).await.unwrap_err(),
            Error::CourierNotFound { id: 999 }
        ));

        let assigned = assign_courier(&db, order.id, courier.id).await?;
        assert_eq!(assigned.courier_id, Some(courier.id));
        assert_eq!(assigned.status, OrderStatus::New);
        assert_eq!(list_orders_for_courier(&db, courier.id).await?, vec![assigned]);

        cancel_order(&db, order.id).await?;
        assert!(matches!(
            assign_courier(&db, order.id, courier.id).await.unwrap_err(),
            Error::InvalidTransition { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Roses", 1000.0).await?;
        let first = create_test_order(&db, product.id, 1).await?;
        let second = create_test_order(&db, product.id, 1).await?;

        let ids: Vec<i64> = list_orders(&db).await?.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        Ok(())
    }
}
