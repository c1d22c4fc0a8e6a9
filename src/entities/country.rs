//! Country entity - Represents a destination country served by the cargo line.
//!
//! Each country carries three localized display names and up to three
//! free-text delivery-time descriptions (origin to hub, hub to destination,
//! office to home). Countries are referenced by pricing tiers and orders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Country database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    /// Unique identifier for the country
    #[sea_orm(primary_key)]
    pub id: i64,
    /// English display name
    pub name_en: String,
    /// Sinhala display name
    pub name_si: String,
    /// Tamil display name
    pub name_ta: String,
    /// Free-text delivery time for the origin-to-hub leg (may be empty)
    pub delivery_time_range_1: String,
    /// Free-text delivery time for the hub-to-destination leg (may be empty)
    pub delivery_time_range_2: String,
    /// Free-text delivery time for the office-to-home leg (may be empty)
    pub delivery_time_range_3: String,
    /// Whether the country is currently offered to customers
    pub is_active: bool,
    /// When the country was created
    pub created_at: DateTimeUtc,
}

impl Model {
    /// The configured delivery-time descriptions, empty ones omitted, in
    /// fixed leg order (origin to hub, hub to destination, office to home).
    pub fn delivery_time_ranges(&self) -> Vec<String> {
        [
            &self.delivery_time_range_1,
            &self.delivery_time_range_2,
            &self.delivery_time_range_3,
        ]
        .into_iter()
        .filter(|range| !range.is_empty())
        .cloned()
        .collect()
    }
}

/// Defines relationships between Country and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One country has many pricing tiers
    #[sea_orm(has_many = "super::pricing_tier::Entity")]
    PricingTiers,
    /// One country has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::pricing_tier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingTiers.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
