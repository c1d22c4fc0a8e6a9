//! Country business logic - Handles all country-related operations.
//!
//! Provides functions for creating, retrieving, and deleting destination
//! countries. Deletion is guarded: a country that still has orders pointing
//! at it cannot be removed, because orders keep their country reference for
//! the life of the audit trail.

use crate::{
    entities::{Country, Order, country, order, pricing_tier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Retrieves all active countries, ordered alphabetically by English name.
///
/// This is the list offered to customers in the quote and order forms.
pub async fn get_active_countries(db: &DatabaseConnection) -> Result<Vec<country::Model>> {
    Country::find()
        .filter(country::Column::IsActive.eq(true))
        .order_by_asc(country::Column::NameEn)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a country by its unique ID.
pub async fn get_country_by_id<C>(db: &C, country_id: i64) -> Result<Option<country::Model>>
where
    C: ConnectionTrait,
{
    Country::find_by_id(country_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new country with the given localized names and delivery-time
/// descriptions, performing input validation.
#[allow(clippy::too_many_arguments)]
pub async fn create_country(
    db: &DatabaseConnection,
    name_en: String,
    name_si: String,
    name_ta: String,
    delivery_time_range_1: String,
    delivery_time_range_2: String,
    delivery_time_range_3: String,
    is_active: bool,
) -> Result<country::Model> {
    if name_en.trim().is_empty() {
        return Err(Error::Config {
            message: "Country name cannot be empty".to_string(),
        });
    }

    let country = country::ActiveModel {
        name_en: Set(name_en.trim().to_string()),
        name_si: Set(name_si),
        name_ta: Set(name_ta),
        delivery_time_range_1: Set(delivery_time_range_1),
        delivery_time_range_2: Set(delivery_time_range_2),
        delivery_time_range_3: Set(delivery_time_range_3),
        is_active: Set(is_active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    country.insert(db).await.map_err(Into::into)
}

/// Deletes a country and its pricing tiers.
///
/// Rejected with [`Error::CountryInUse`] while any order references the
/// country; tracking history must stay resolvable forever.
pub async fn delete_country(db: &DatabaseConnection, country_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let country = Country::find_by_id(country_id)
        .one(&txn)
        .await?
        .ok_or(Error::CountryNotFound { id: country_id })?;

    let order_count = Order::find()
        .filter(order::Column::CountryId.eq(country_id))
        .count(&txn)
        .await?;
    if order_count > 0 {
        return Err(Error::CountryInUse {
            id: country_id,
            order_count,
        });
    }

    pricing_tier::Entity::delete_many()
        .filter(pricing_tier::Column::CountryId.eq(country_id))
        .exec(&txn)
        .await?;
    country.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}
