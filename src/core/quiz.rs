//! Recommendation quiz - narrows the catalog by occasion and price range.
//!
//! The storefront asks two questions (what is the occasion, how much to spend),
//! filters the active catalog with the answers and suggests one matching bouquet
//! picked at random. When the customer asks for a consultation afterwards, their
//! answers travel along in the request comment.
//!
//! Archived products and the price range are filtered in SQL. Occasion names
//! are matched in Rust because SQLite `lower()` and `LIKE` only fold ASCII
//! letters, and occasion names are often Cyrillic.

use crate::{
    entities::{Occasion, Product, ProductOccasion, occasion, product, product_occasion},
    errors::{Error, Result},
    notify::messages::format_price,
};
use rand::seq::SliceRandom;
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Upper bound (inclusive) of the low price range.
pub const LOW_MAX: f64 = 1000.0;
/// Upper bound (inclusive) of the medium price range.
pub const MEDIUM_MAX: f64 = 5000.0;

/// Coarse price range used by the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBucket {
    /// Up to 1000 inclusive
    Low,
    /// Above 1000 up to 5000 inclusive
    Medium,
    /// Above 5000
    High,
}

impl PriceBucket {
    /// The bucket a price falls into.
    #[must_use]
    pub fn classify(price: f64) -> Self {
        if price <= LOW_MAX {
            Self::Low
        } else if price <= MEDIUM_MAX {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Whether `price` falls into this range.
    #[must_use]
    pub fn contains(self, price: f64) -> bool {
        Self::classify(price) == self
    }

    /// SQL condition on the product price selecting this range.
    #[must_use]
    pub fn condition(self) -> Condition {
        let price = product::Column::Price;
        match self {
            Self::Low => Condition::all().add(price.lte(LOW_MAX)),
            Self::Medium => Condition::all()
                .add(price.gt(LOW_MAX))
                .add(price.lte(MEDIUM_MAX)),
            Self::High => Condition::all().add(price.gt(MEDIUM_MAX)),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human-readable range, as shown to the customer.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "up to 1000 RUB",
            Self::Medium => "1000 - 5000 RUB",
            Self::High => "over 5000 RUB",
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(Error::validation(
                "price",
                format!("unknown price range '{other}', expected low, medium or high"),
            )),
        }
    }
}

/// Ids of the occasions whose name contains `needle`, compared
/// case-insensitively with full Unicode folding.
fn matching_occasion_ids(needle: &str, occasions: &[occasion::Model]) -> Vec<i64> {
    let needle = needle.to_lowercase();
    occasions
        .iter()
        .filter(|o| o.name.to_lowercase().contains(&needle))
        .map(|o| o.id)
        .collect()
}

/// Active products matching the quiz answers, ordered by id.
///
/// Either answer may be omitted; an empty occasion string counts as omitted.
pub async fn filter_products(
    db: &DatabaseConnection,
    occasion: Option<&str>,
    bucket: Option<PriceBucket>,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find().filter(product::Column::IsDeleted.eq(false));

    if let Some(bucket) = bucket {
        query = query.filter(bucket.condition());
    }

    if let Some(needle) = occasion.map(str::trim).filter(|s| !s.is_empty()) {
        let occasions = Occasion::find().all(db).await?;
        let occasion_ids = matching_occasion_ids(needle, &occasions);
        let product_ids: Vec<i64> = if occasion_ids.is_empty() {
            Vec::new()
        } else {
            ProductOccasion::find()
                .select_only()
                .column(product_occasion::Column::ProductId)
                .filter(product_occasion::Column::OccasionId.is_in(occasion_ids))
                .distinct()
                .into_tuple()
                .all(db)
                .await?
        };
        if product_ids.is_empty() {
            tracing::debug!(occasion = needle, "No products linked to the occasion");
            return Ok(Vec::new());
        }
        query = query.filter(product::Column::Id.is_in(product_ids));
    }

    let products = query.order_by_asc(product::Column::Id).all(db).await?;

    tracing::debug!(
        occasion = ?occasion,
        bucket = ?bucket,
        matches = products.len(),
        "Quiz filter applied"
    );
    Ok(products)
}

/// Picks one candidate uniformly at random.
#[must_use]
pub fn pick_random(candidates: &[product::Model]) -> Option<product::Model> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}

/// Filters the catalog with the quiz answers and suggests one bouquet.
pub async fn recommend(
    db: &DatabaseConnection,
    occasion: Option<&str>,
    bucket: Option<PriceBucket>,
) -> Result<Option<product::Model>> {
    let candidates = filter_products(db, occasion, bucket).await?;
    Ok(pick_random(&candidates))
}

/// Builds a consultation comment from the customer's quiz answers.
///
/// Returns an empty string when nothing was answered.
#[must_use]
pub fn compose_quiz_comment(
    occasion: Option<&str>,
    bucket: Option<PriceBucket>,
    bouquet: Option<&product::Model>,
) -> String {
    let mut lines = Vec::new();
    if let Some(occasion) = occasion.map(str::trim).filter(|s| !s.is_empty()) {
        lines.push(format!("Occasion: {occasion}"));
    }
    if let Some(bucket) = bucket {
        lines.push(format!("Budget: {}", bucket.label()));
    }
    if let Some(bouquet) = bouquet {
        lines.push(format!(
            "Suggested bouquet: {} ({})",
            bouquet.name,
            format_price(bouquet.price)
        ));
    }
    lines.join("\n")
}
