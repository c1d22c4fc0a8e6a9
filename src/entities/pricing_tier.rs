//! Pricing tier entity - One step of a country's origin-to-hub price table.
//!
//! `weight_kg` is the inclusive upper bound of the step and `price_eur` the
//! flat price for any shipment up to that bound. Lookup rounds a requested
//! weight up to the smallest covering tier. `(country_id, weight_kg)` is
//! unique; the index is created in [`crate::config::database::create_tables`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pricing tier database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_tiers")]
pub struct Model {
    /// Unique identifier for the tier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Country this tier belongs to
    pub country_id: i64,
    /// Inclusive upper weight bound of the step, in kilograms
    pub weight_kg: f64,
    /// Flat origin-to-hub price for shipments up to the bound, in EUR
    pub price_eur: f64,
    /// When the tier was created
    pub created_at: DateTimeUtc,
    /// When the tier was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between PricingTier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each tier belongs to one country
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id"
    )]
    Country,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
