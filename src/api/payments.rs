//! Payment stub.
//!
//! There is no payment provider behind these endpoints: `pay` returns the
//! checkout context a payment widget would need, and the provider's redirects land
//! on `success` or `fail`. The success callback is not signed, so anyone who
//! knows an order id can confirm its payment.

use super::{AppState, error::ApiResult};
use crate::{core::order, errors::Error};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
};
use serde::{Deserialize, Serialize};

/// Query parameters of the payment page.
#[derive(Debug, Deserialize)]
pub struct PayParams {
    /// Order being paid for, if already placed
    pub order_id: Option<i64>,
    /// Amount to charge; falls back to the configured default
    pub amount: Option<String>,
}

/// Data the payment widget needs to start a checkout.
#[derive(Debug, Serialize)]
pub struct Checkout {
    /// Bouquet being paid for
    pub bouquet_id: i64,
    /// Related order, if any
    pub order_id: Option<i64>,
    /// Amount as a decimal string
    pub amount: String,
    /// Public merchant id of the payment widget
    pub public_id: String,
}

/// Query parameters of the success callback.
#[derive(Debug, Deserialize)]
pub struct SuccessParams {
    /// Order that was paid
    pub order_id: i64,
}

/// Payment page and callback routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/pay/:bouquet_id", get(pay))
        .route("/payments/success", get(success))
        .route("/payments/fail", get(fail))
}

async fn pay(
    State(state): State<AppState>,
    Path(bouquet_id): Path<i64>,
    Query(params): Query<PayParams>,
) -> ApiResult<Json<Checkout>> {
    let amount = params
        .amount
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| state.config.payments.default_amount.clone());
    let parsed: f64 = amount
        .trim()
        .parse()
        .map_err(|_| Error::validation("amount", format!("'{amount}' is not a number")))?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(Error::InvalidAmount { amount: parsed }.into());
    }

    Ok(Json(Checkout {
        bouquet_id,
        order_id: params.order_id,
        amount,
        public_id: state.config.payments.public_id.clone(),
    }))
}

async fn success(
    State(state): State<AppState>,
    Query(params): Query<SuccessParams>,
) -> ApiResult<Redirect> {
    order::mark_paid(&state.db, &state.notifier, params.order_id).await?;
    Ok(Redirect::to("/"))
}

async fn fail() -> &'static str {
    "Payment declined"
}
