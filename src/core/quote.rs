//! Price calculation - turns (country, weight, options, coupon) into a
//! customer-facing breakdown.
//!
//! Quoting is pure and idempotent: it reads pricing tiers, rates, and coupon
//! state but never mutates anything, so customers can re-quote freely without
//! burning coupon uses. Submission re-prices inside its own transaction and
//! is the only place a coupon is redeemed.

use crate::{
    config::settings::EngineSettings,
    core::{coupon, country, pricing},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;

/// Weight ceiling accepted by the engine, in kilograms.
pub const MAX_WEIGHT_KG: f64 = 1000.0;

/// Full price breakdown for one prospective shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    /// Flat price of the origin-to-hub leg from the country's tier table
    pub origin_to_hub: f64,
    /// Weight times the configured hub-to-destination rate
    pub hub_to_destination: f64,
    /// Weight times the local-delivery rate, zero when not requested
    pub local_delivery_cost: f64,
    /// Sum of the three legs, before any discount
    pub subtotal: f64,
    /// Discount granted by the coupon outcome, in EUR
    pub discount: f64,
    /// `max(0, subtotal - discount)`
    pub total: f64,
    /// `total / weight`, zero-safe
    pub effective_cost_per_kg: f64,
    /// The country's configured delivery-time descriptions, empty ones omitted
    pub delivery_time_ranges: Vec<String>,
    /// What happened to the supplied coupon code, if any
    pub coupon: crate::core::coupon::CouponOutcome,
}

impl PriceBreakdown {
    /// Customer-facing coupon message, `None` when no code was supplied.
    pub fn coupon_message(&self) -> Option<String> {
        self.coupon.message()
    }
}

pub(crate) fn check_weight(weight_kg: f64) -> Result<()> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 || weight_kg > MAX_WEIGHT_KG {
        return Err(Error::InvalidWeight { weight: weight_kg });
    }
    Ok(())
}

/// Prices the origin-to-hub leg for a country and weight.
///
/// A missing tier is a configuration gap: by default it surfaces as
/// [`Error::NoPricingTier`]; with `zero_cost_on_missing_tier` set the legacy
/// silent-zero behavior applies instead.
pub(crate) async fn origin_to_hub_cost<C>(
    db: &C,
    settings: &EngineSettings,
    country_id: i64,
    weight_kg: f64,
) -> Result<f64>
where
    C: ConnectionTrait,
{
    match pricing::find_tier_for_weight(db, country_id, weight_kg).await? {
        Some(tier) => Ok(tier.price_eur),
        None if settings.zero_cost_on_missing_tier => Ok(0.0),
        None => Err(Error::NoPricingTier {
            country_id,
            weight: weight_kg,
        }),
    }
}

/// Computes a price breakdown for a given day, without side effects.
pub async fn quote_price_on<C>(
    db: &C,
    settings: &EngineSettings,
    country_id: i64,
    weight_kg: f64,
    local_delivery: bool,
    coupon_code: Option<&str>,
    today: NaiveDate,
) -> Result<PriceBreakdown>
where
    C: ConnectionTrait,
{
    check_weight(weight_kg)?;

    let country = country::get_country_by_id(db, country_id)
        .await?
        .ok_or(Error::CountryNotFound { id: country_id })?;

    let origin_to_hub = origin_to_hub_cost(db, settings, country_id, weight_kg).await?;
    let hub_to_destination = weight_kg * settings.hub_rate_per_kg;
    let local_delivery_cost = if local_delivery {
        weight_kg * settings.local_delivery_rate_per_kg
    } else {
        0.0
    };

    let subtotal = origin_to_hub + hub_to_destination + local_delivery_cost;
    let coupon = coupon::validate_coupon_on(db, coupon_code, subtotal, today).await?;
    let discount = coupon.discount();
    let total = (subtotal - discount).max(0.0);
    let effective_cost_per_kg = if weight_kg > 0.0 { total / weight_kg } else { 0.0 };

    Ok(PriceBreakdown {
        origin_to_hub,
        hub_to_destination,
        local_delivery_cost,
        subtotal,
        discount,
        total,
        effective_cost_per_kg,
        delivery_time_ranges: country.delivery_time_ranges(),
        coupon,
    })
}

/// Computes a price breakdown using the server-local date.
///
/// This is the read-only quote surface: calling it any number of times with
/// identical inputs yields identical output and never changes coupon usage.
pub async fn quote_price<C>(
    db: &C,
    settings: &EngineSettings,
    country_id: i64,
    weight_kg: f64,
    local_delivery: bool,
    coupon_code: Option<&str>,
) -> Result<PriceBreakdown>
where
    C: ConnectionTrait,
{
    quote_price_on(
        db,
        settings,
        country_id,
        weight_kg,
        local_delivery,
        coupon_code,
        chrono::Local::now().date_naive(),
    )
    .await
}
