//! Database configuration module for the cargo engine.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. On top of the generated tables it creates the composite unique
//! index on `pricing_tiers (country_id, weight_kg)` - the storage-level
//! guarantee that a country's price table stays a well-formed step function.
//! Tracking-ID and coupon-code uniqueness come from single-column `unique`
//! attributes on the entities themselves.

use crate::entities::{Country, Coupon, Order, PricingTier, TrackingHistory, pricing_tier};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/cargodesk.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to a default local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all necessary database tables and indexes from the entity definitions.
///
/// Uniqueness of `orders.tracking_id` and `coupons.code` is declared on the
/// entities and lands in the generated `CREATE TABLE` statements; the
/// composite pricing-tier index is added explicitly afterwards.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let country_table = schema.create_table_from_entity(Country);
    let pricing_tier_table = schema.create_table_from_entity(PricingTier);
    let coupon_table = schema.create_table_from_entity(Coupon);
    let order_table = schema.create_table_from_entity(Order);
    let tracking_history_table = schema.create_table_from_entity(TrackingHistory);

    db.execute(builder.build(&country_table)).await?;
    db.execute(builder.build(&pricing_tier_table)).await?;
    db.execute(builder.build(&coupon_table)).await?;
    db.execute(builder.build(&order_table)).await?;
    db.execute(builder.build(&tracking_history_table)).await?;

    let tier_index = Index::create()
        .name("idx_pricing_tiers_country_weight")
        .table(pricing_tier::Entity)
        .col(pricing_tier::Column::CountryId)
        .col(pricing_tier::Column::WeightKg)
        .unique()
        .to_owned();
    db.execute(builder.build(&tier_index)).await?;

    Ok(())
}
