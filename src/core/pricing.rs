//! Pricing-table business logic - step-function lookup and tier management.
//!
//! Each country's tiers form an ascending step function: a tier's `weight_kg`
//! is the inclusive upper bound of its step. Lookup rounds the requested
//! weight up to the smallest covering tier. Duplicate `(country, weight)`
//! pairs are rejected here at configuration time and by the composite unique
//! index at the storage level.

use crate::{
    entities::{PricingTier, pricing_tier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Finds the tier pricing a shipment of `weight_kg` to the given country.
///
/// Among all tiers with `weight_kg >= ` the requested weight, picks the one
/// with the smallest bound (lowest qualifying tier, not the cheapest).
/// Returns `None` when no tier covers the weight - a configuration gap the
/// caller decides how to surface. No side effects.
pub async fn find_tier_for_weight<C>(
    db: &C,
    country_id: i64,
    weight_kg: f64,
) -> Result<Option<pricing_tier::Model>>
where
    C: ConnectionTrait,
{
    PricingTier::find()
        .filter(pricing_tier::Column::CountryId.eq(country_id))
        .filter(pricing_tier::Column::WeightKg.gte(weight_kg))
        .order_by_asc(pricing_tier::Column::WeightKg)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all tiers for a country, ascending by weight bound.
pub async fn get_tiers_for_country(
    db: &DatabaseConnection,
    country_id: i64,
) -> Result<Vec<pricing_tier::Model>> {
    PricingTier::find()
        .filter(pricing_tier::Column::CountryId.eq(country_id))
        .order_by_asc(pricing_tier::Column::WeightKg)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new pricing tier, performing input validation.
///
/// Rejects non-positive or non-finite bounds and prices, and duplicate
/// `(country, weight)` pairs.
pub async fn create_pricing_tier(
    db: &DatabaseConnection,
    country_id: i64,
    weight_kg: f64,
    price_eur: f64,
) -> Result<pricing_tier::Model> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(Error::InvalidWeight { weight: weight_kg });
    }
    if !price_eur.is_finite() || price_eur < 0.0 {
        return Err(Error::Config {
            message: format!("Tier price must be non-negative: {price_eur}"),
        });
    }

    let existing = PricingTier::find()
        .filter(pricing_tier::Column::CountryId.eq(country_id))
        .filter(pricing_tier::Column::WeightKg.eq(weight_kg))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateTier {
            country_id,
            weight: weight_kg,
        });
    }

    let now = chrono::Utc::now();
    let tier = pricing_tier::ActiveModel {
        country_id: Set(country_id),
        weight_kg: Set(weight_kg),
        price_eur: Set(price_eur),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    tier.insert(db).await.map_err(Into::into)
}

/// Deletes a pricing tier by ID.
pub async fn delete_pricing_tier(db: &DatabaseConnection, tier_id: i64) -> Result<()> {
    PricingTier::delete_by_id(tier_id).exec(db).await?;
    Ok(())
}
