//! Consultation request business logic.
//!
//! A request is stored as `New`, announced to the staff chat and moved to
//! `InProgress` straight away, before any florist picks it up. Florist assignment
//! is independent of the status: it only drives `processed_at`, which is stamped
//! on the first assignment and cleared when the florist is removed.

use crate::{
    core::{florist::require_florist, validation},
    entities::{ConsultationRequest, RequestStatus, consultation_request},
    errors::{Error, Result},
    notify::{Notifier, messages},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

const CUSTOMER_NAME_MAX_CHARS: usize = 100;

/// Input for `create_request`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewConsultation {
    /// Customer name
    pub customer_name: String,
    /// Contact phone
    pub customer_phone: String,
    /// Free-form note, quiz answers included
    #[serde(default)]
    pub comment: Option<String>,
}

async fn load_request<C>(conn: &C, request_id: i64) -> Result<consultation_request::Model>
where
    C: ConnectionTrait,
{
    ConsultationRequest::find_by_id(request_id)
        .one(conn)
        .await?
        .ok_or(Error::ConsultationNotFound { id: request_id })
}

/// Records a consultation request and notifies the staff chat once.
///
/// The returned request is already `InProgress`.
pub async fn create_request(
    db: &DatabaseConnection,
    notifier: &Notifier,
    new: NewConsultation,
) -> Result<consultation_request::Model> {
    let customer_name =
        validation::require_text("customer_name", &new.customer_name, CUSTOMER_NAME_MAX_CHARS)?;
    let customer_phone = validation::validate_phone(&new.customer_phone)?;
    let comment = new.comment.map(|c| c.trim().to_string()).unwrap_or_default();

    let txn = db.begin().await?;

    let created = consultation_request::ActiveModel {
        customer_name: Set(customer_name),
        customer_phone: Set(customer_phone),
        comment: Set(comment),
        status: Set(RequestStatus::New),
        florist_id: Set(None),
        created_at: Set(Utc::now()),
        processed_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut request: consultation_request::ActiveModel = created.into();
    request.status = Set(RequestStatus::InProgress);
    let result = request.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(request_id = result.id, "Consultation request received");

    notifier.notify(&messages::new_consultation(&result)).await;

    Ok(result)
}

/// Looks up a consultation request by id.
pub async fn get_request_by_id(
    db: &DatabaseConnection,
    request_id: i64,
) -> Result<Option<consultation_request::Model>> {
    ConsultationRequest::find_by_id(request_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All requests, newest first.
pub async fn list_requests(db: &DatabaseConnection) -> Result<Vec<consultation_request::Model>> {
    ConsultationRequest::find()
        .order_by_desc(consultation_request::Column::CreatedAt)
        .order_by_desc(consultation_request::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Assigns a florist. `processed_at` keeps its first value across reassignments.
pub async fn assign_florist(
    db: &DatabaseConnection,
    request_id: i64,
    florist_id: i64,
) -> Result<consultation_request::Model> {
    let txn = db.begin().await?;

    let current = load_request(&txn, request_id).await?;
    let florist = require_florist(&txn, florist_id).await?;
    let processed_at = current.processed_at.unwrap_or_else(Utc::now);

    let mut request: consultation_request::ActiveModel = current.into();
    request.florist_id = Set(Some(florist.id));
    request.processed_at = Set(Some(processed_at));
    let result = request.update(&txn).await?;

    txn.commit().await?;
    tracing::info!(request_id, florist_id, "Florist assigned to consultation");
    Ok(result)
}

/// Removes the florist and clears `processed_at`.
pub async fn unassign_florist(
    db: &DatabaseConnection,
    request_id: i64,
) -> Result<consultation_request::Model> {
    let current = load_request(db, request_id).await?;

    let mut request: consultation_request::ActiveModel = current.into();
    request.florist_id = Set(None);
    request.processed_at = Set(None);

    request.update(db).await.map_err(Into::into)
}

/// Closes a request that is being worked on.
pub async fn complete_request(
    db: &DatabaseConnection,
    request_id: i64,
) -> Result<consultation_request::Model> {
    let current = load_request(db, request_id).await?;
    if current.status != RequestStatus::InProgress {
        return Err(Error::InvalidTransition {
            from: current.status.as_str().to_string(),
            to: RequestStatus::Completed.as_str().to_string(),
        });
    }

    let mut request: consultation_request::ActiveModel = current.into();
    request.status = Set(RequestStatus::Completed);
    let result = request.update(db).await?;

    tracing::info!(request_id, "Consultation completed");
    Ok(result)
}
