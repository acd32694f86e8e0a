//! HTTP API - a thin axum layer over `core`.
//!
//! Handlers only translate between HTTP and the business functions; every rule
//! lives in `core`. Errors are rendered as `{"error": "..."}` with a status code
//! chosen by `ApiError`.

/// Catalog, bouquet and quiz endpoints
pub mod catalog;
/// Consultation request endpoints
pub mod consultations;
/// Error to response mapping
pub mod error;
/// Order endpoints
pub mod orders;
/// Payment stub endpoints
pub mod payments;
/// Shared handler state
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(catalog::routes())
        .merge(orders::routes())
        .merge(consultations::routes())
        .merge(payments::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
