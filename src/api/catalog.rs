//! Storefront read endpoints: catalog listings, bouquet pages and the quiz.

use super::{AppState, error::ApiResult};
use crate::{
    core::{
        catalog::{self, CompositionEntry, OccasionGroup},
        product,
        quiz::{self, PriceBucket},
    },
    entities::{occasion, product as product_entity},
    errors::Error,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

/// Quiz answers passed as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct QuizParams {
    /// Occasion name or a fragment of it
    pub occasion: Option<String>,
    /// Price range: `low`, `medium` or `high`
    pub price: Option<String>,
}

impl QuizParams {
    /// Parses the price answer; blank counts as unanswered.
    pub fn bucket(&self) -> crate::errors::Result<Option<PriceBucket>> {
        self.price
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::parse::<PriceBucket>)
            .transpose()
    }
}

/// A product card with its composition and occasions.
#[derive(Debug, Serialize)]
pub struct BouquetDetails {
    /// The product itself
    #[serde(flatten)]
    pub product: product_entity::Model,
    /// Flowers in the bouquet with their quantities
    pub composition: Vec<CompositionEntry>,
    /// Composition rendered as one line
    pub composition_display: String,
    /// Every occasion the bouquet suits
    pub occasions: Vec<occasion::Model>,
    /// Occasion the bouquet is primarily meant for
    pub primary_occasion: Option<occasion::Model>,
}

/// Answer to a quiz submission.
#[derive(Debug, Serialize)]
pub struct QuizResult {
    /// Occasion answer as given
    pub occasion: Option<String>,
    /// Parsed price range answer
    pub price: Option<PriceBucket>,
    /// Suggested bouquet, if anything matched
    pub bouquet: Option<BouquetDetails>,
}

/// Catalog and quiz routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(list_catalog))
        .route("/catalog/recommended", get(list_recommended))
        .route("/catalog/filter", get(filter_catalog))
        .route("/catalog/occasions", get(catalog_by_occasion))
        .route("/quiz/result", get(quiz_result))
        .route("/bouquets/:id", get(bouquet_details))
        .route("/bouquets/:id/related", get(related_bouquets))
}

async fn list_catalog(State(state): State<AppState>) -> ApiResult<Json<Vec<product_entity::Model>>> {
    Ok(Json(product::get_all_active_products(&state.db).await?))
}

async fn list_recommended(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<product_entity::Model>>> {
    Ok(Json(product::get_recommended_products(&state.db).await?))
}

async fn filter_catalog(
    State(state): State<AppState>,
    Query(params): Query<QuizParams>,
) -> ApiResult<Json<Vec<product_entity::Model>>> {
    let bucket = params.bucket()?;
    let products = quiz::filter_products(&state.db, params.occasion.as_deref(), bucket).await?;
    Ok(Json(products))
}

async fn catalog_by_occasion(State(state): State<AppState>) -> ApiResult<Json<Vec<OccasionGroup>>> {
    Ok(Json(catalog::products_by_primary_occasion(&state.db).await?))
}

async fn load_details(state: &AppState, product: product_entity::Model) -> ApiResult<BouquetDetails> {
    let composition = catalog::composition(&state.db, product.id).await?;
    let composition_display = catalog::format_composition(&composition);
    let occasions = catalog::occasions_for_product(&state.db, product.id).await?;
    let primary_occasion = catalog::primary_occasion(&state.db, product.id).await?;

    Ok(BouquetDetails {
        product,
        composition,
        composition_display,
        occasions,
        primary_occasion,
    })
}

async fn quiz_result(
    State(state): State<AppState>,
    Query(params): Query<QuizParams>,
) -> ApiResult<Json<QuizResult>> {
    let bucket = params.bucket()?;
    let picked = quiz::recommend(&state.db, params.occasion.as_deref(), bucket).await?;

    let bouquet = match picked {
        Some(product) => Some(load_details(&state, product).await?),
        None => None,
    };

    Ok(Json(QuizResult {
        occasion: params.occasion,
        price: bucket,
        bouquet,
    }))
}

async fn bouquet_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BouquetDetails>> {
    let product = product::get_product_by_id(&state.db, id)
        .await?
        .ok_or(Error::ProductNotFound { id })?;
    Ok(Json(load_details(&state, product).await?))
}

async fn related_bouquets(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<product_entity::Model>>> {
    product::get_product_by_id(&state.db, id)
        .await?
        .ok_or(Error::ProductNotFound { id })?;
    Ok(Json(catalog::related_products(&state.db, id).await?))
}
