//! Consultation request endpoints.
//!
//! The storefront form may carry the customer's quiz answers instead of a typed
//! comment; they are folded into the request comment.

use super::{AppState, error::ApiResult};
use crate::{
    core::{
        consultation::{self, NewConsultation},
        product,
        quiz::{self, PriceBucket},
    },
    entities::consultation_request,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;

/// Consultation request form, optionally carrying quiz answers.
#[derive(Debug, Deserialize)]
pub struct ConsultationForm {
    /// Customer name
    pub customer_name: String,
    /// Contact phone
    pub customer_phone: String,
    /// Free-form note from the customer
    #[serde(default)]
    pub comment: Option<String>,
    /// Quiz answer: occasion
    #[serde(default)]
    pub occasion: Option<String>,
    /// Quiz answer: price range
    #[serde(default)]
    pub price: Option<PriceBucket>,
    /// Bouquet suggested by the quiz
    #[serde(default)]
    pub bouquet_id: Option<i64>,
}

/// Body of the florist assignment call.
#[derive(Debug, Deserialize)]
pub struct FloristAssignment {
    /// Florist taking the request
    pub florist_id: i64,
}

/// Consultation request routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/consultations", post(create_request))
        .route("/consultations/:id", get(get_request))
        .route(
            "/consultations/:id/florist",
            put(assign_florist).delete(unassign_florist),
        )
        .route("/consultations/:id/complete", post(complete_request))
}

async fn create_request(
    State(state): State<AppState>,
    Json(form): Json<ConsultationForm>,
) -> ApiResult<(StatusCode, Json<consultation_request::Model>)> {
    let typed = form
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let comment = match typed {
        Some(comment) => Some(comment),
        None => {
            let bouquet = match form.bouquet_id {
                Some(id) => product::get_product_by_id(&state.db, id).await?,
                None => None,
            };
            let composed =
                quiz::compose_quiz_comment(form.occasion.as_deref(), form.price, bouquet.as_ref());
            (!composed.is_empty()).then_some(composed)
        }
    };

    let request = consultation::create_request(
        &state.db,
        &state.notifier,
        NewConsultation {
            customer_name: form.customer_name,
            customer_phone: form.customer_phone,
            comment,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<consultation_request::Model>> {
    let request = consultation::get_request_by_id(&state.db, id)
        .await?
        .ok_or(Error::ConsultationNotFound { id })?;
    Ok(Json(request))
}

async fn assign_florist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<FloristAssignment>,
) -> ApiResult<Json<consultation_request::Model>> {
    Ok(Json(
        consultation::assign_florist(&state.db, id, body.florist_id).await?,
    ))
}

async fn unassign_florist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<consultation_request::Model>> {
    Ok(Json(consultation::unassign_florist(&state.db, id).await?))
}

async fn complete_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<consultation_request::Model>> {
    Ok(Json(consultation::complete_request(&state.db, id).await?))
}
