/// Catalog structure: occasions, flowers, compositions and storefront groupings
pub mod catalog;
/// Consultation request lifecycle
pub mod consultation;
/// Courier registry and least-loaded assignment policy
pub mod courier;
/// Florist registry
pub mod florist;
/// Order lifecycle
pub mod order;
/// Product management and the recommended-products rule
pub mod product;
/// Quiz filtering, random pick and comment composition
pub mod quiz;
/// Shared input validation
pub mod validation;
