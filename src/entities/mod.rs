//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the storefront tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod consultation_request;
pub mod courier;
pub mod florist;
pub mod flower;
pub mod occasion;
pub mod order;
pub mod product;
pub mod product_flower;
pub mod product_occasion;

// Re-export specific types to avoid conflicts
pub use consultation_request::{
    Column as ConsultationRequestColumn, Entity as ConsultationRequest,
    Model as ConsultationRequestModel, RequestStatus,
};
pub use courier::{Column as CourierColumn, Entity as Courier, Model as CourierModel};
pub use florist::{Column as FloristColumn, Entity as Florist, Model as FloristModel};
pub use flower::{Column as FlowerColumn, Entity as Flower, Model as FlowerModel};
pub use occasion::{Column as OccasionColumn, Entity as Occasion, Model as OccasionModel};
pub use order::{
    Column as OrderColumn, DeliverySlot, Entity as Order, Model as OrderModel, OrderStatus,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_flower::{
    Column as ProductFlowerColumn, Entity as ProductFlower, Model as ProductFlowerModel,
};
pub use product_occasion::{
    Column as ProductOccasionColumn, Entity as ProductOccasion, Model as ProductOccasionModel,
};
