//! Florist business logic - staff who answer consultation requests.

use crate::{
    core::validation,
    entities::{Florist, florist},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

const NAME_MAX_CHARS: usize = 100;

/// Registers a florist. All contact fields are required.
pub async fn create_florist(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
    email: &str,
) -> Result<florist::Model> {
    let name = validation::require_text("name", name, NAME_MAX_CHARS)?;
    let phone = validation::validate_phone(phone)?;
    let email = validation::validate_email(email)?;

    florist::ActiveModel {
        name: Set(name),
        phone: Set(phone),
        email: Set(email),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Looks up a florist by id.
pub async fn get_florist_by_id(
    db: &DatabaseConnection,
    florist_id: i64,
) -> Result<Option<florist::Model>> {
    Florist::find_by_id(florist_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like `get_florist_by_id`, but a missing florist is an error.
pub async fn require_florist<C>(conn: &C, florist_id: i64) -> Result<florist::Model>
where
    C: ConnectionTrait,
{
    Florist::find_by_id(florist_id)
        .one(conn)
        .await?
        .ok_or(Error::FloristNotFound { id: florist_id })
}

/// All florists, sorted by name.
pub async fn list_florists(db: &DatabaseConnection) -> Result<Vec<florist::Model>> {
    Florist::find()
        .order_by_asc(florist::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
