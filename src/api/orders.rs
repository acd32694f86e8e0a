//! Order endpoints.

use super::{AppState, error::ApiResult};
use crate::{
    core::order::{self, NewOrder},
    entities::order as order_entity,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

/// Order placement and lifecycle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/cancel", post(cancel_order))
        .route("/orders/:id/deliver", post(deliver_order))
}

async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<NewOrder>,
) -> ApiResult<(StatusCode, Json<order_entity::Model>)> {
    let order = order::create_order(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<order_entity::Model>> {
    let order = order::get_order_by_id(&state.db, id)
        .await?
        .ok_or(Error::OrderNotFound { id })?;
    Ok(Json(order))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<order_entity::Model>> {
    Ok(Json(order::cancel_order(&state.db, id).await?))
}

async fn deliver_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<order_entity::Model>> {
    Ok(Json(order::mark_delivered(&state.db, id).await?))
}
