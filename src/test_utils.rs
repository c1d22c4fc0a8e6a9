//! Shared test utilities for Cargodesk.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::settings::EngineSettings,
    core::{
        coupon, country,
        order::{OrderForm, ReceiverDetails, SenderDetails},
        pricing,
    },
    entities::{self, DiscountType},
    errors::Result,
    notify::{Notifier, OrderEvent},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Engine settings used across tests: the default rates (hub 3.50/kg,
/// local 1.00/kg) and the default `YCS` tracking-ID scheme.
#[must_use]
pub fn test_settings() -> EngineSettings {
    EngineSettings::default()
}

/// Today's date, for the date-explicit coupon and quote variants.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Creates an active test country with sensible defaults.
///
/// # Defaults
/// * localized names: same as `name`
/// * delivery time ranges: empty
/// * `is_active`: true
pub async fn create_test_country(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::country::Model> {
    country::create_country(
        db,
        name.to_string(),
        name.to_string(),
        name.to_string(),
        String::new(),
        String::new(),
        String::new(),
        true,
    )
    .await
}

/// Creates a pricing tier for a country.
pub async fn create_test_tier(
    db: &DatabaseConnection,
    country_id: i64,
    weight_kg: f64,
    price_eur: f64,
) -> Result<entities::pricing_tier::Model> {
    pricing::create_pricing_tier(db, country_id, weight_kg, price_eur).await
}

/// Creates an active test coupon with sensible defaults.
///
/// # Defaults
/// * `min_order_value`: 0.0
/// * `max_uses`: unlimited
/// * date window: open-ended
/// * `is_active`: true
pub async fn create_test_coupon(
    db: &DatabaseConnection,
    code: &str,
    discount_type: DiscountType,
    discount_value: f64,
) -> Result<entities::coupon::Model> {
    coupon::create_coupon(
        db,
        code.to_string(),
        discount_type,
        discount_value,
        0.0,
        None,
        None,
        None,
        true,
    )
    .await
}

/// A complete, valid order form for the given country.
///
/// 7 kg with local delivery, no coupon; against the reference tier table
/// {5kg -> 20, 10kg -> 35} this prices at 66.50.
#[must_use]
pub fn sample_order_form(country_id: i64) -> OrderForm {
    OrderForm {
        country_id,
        weight_kg: 7.0,
        sl_delivery: true,
        coupon_code: None,
        sender: SenderDetails {
            name: "Anna Rossi".to_string(),
            email: "anna@example.com".to_string(),
            phone: "+39 333 1234567".to_string(),
            address: "Via Roma 1".to_string(),
            city: "Milan".to_string(),
            postal_code: "20100".to_string(),
            country: "Italy".to_string(),
        },
        receiver: ReceiverDetails {
            name: "Nimal Perera".to_string(),
            phone: "+94 77 1234567".to_string(),
            address: "12 Galle Road".to_string(),
            city: "Colombo".to_string(),
            postal_code: "00300".to_string(),
        },
    }
}

/// A [`Notifier`] that records every event it receives, for asserting on
/// notification behavior.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<OrderEvent>>,
}

impl RecordingNotifier {
    /// Snapshot of the events received so far, in order.
    #[allow(clippy::unwrap_used)]
    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, _settings: &EngineSettings, event: OrderEvent) -> Result<()> {
        #[allow(clippy::unwrap_used)]
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
