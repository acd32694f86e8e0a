//! Mapping of domain errors onto HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Status code for the wrapped error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Validation { .. }
            | Error::InvalidQuantity { .. }
            | Error::InvalidAmount { .. }
            | Error::InvalidTimeSlot { .. } => StatusCode::BAD_REQUEST,
            Error::ProductNotFound { .. }
            | Error::OrderNotFound { .. }
            | Error::CourierNotFound { .. }
            | Error::FloristNotFound { .. }
            | Error::OccasionNotFound { .. }
            | Error::FlowerNotFound { .. }
            | Error::ConsultationNotFound { .. } => StatusCode::NOT_FOUND,
            Error::RecommendedLimit { .. }
            | Error::ProductInUse { .. }
            | Error::InvalidTransition { .. } => StatusCode::CONFLICT,
            Error::Config { .. }
            | Error::Database(_)
            | Error::Notification { .. }
            | Error::Io(_)
            | Error::EnvVar(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("Internal Server Error: {}", self.0);
            "Internal Server Error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Handler result
pub type ApiResult<T> = std::result::Result<T, ApiError>;
