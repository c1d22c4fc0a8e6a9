//! Engine settings loading from settings.toml
//!
//! The legacy system read its rates and tracking-ID shape from ambient
//! key-value options at every call site. Here they live in one explicit
//! [`EngineSettings`] value, loaded once and passed into the price calculator
//! and tracking-ID generator, which keeps both pure and unit-testable.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Bounds on the random tracking-ID suffix length.
pub const TRACKING_ID_LENGTH_MIN: usize = 5;
/// Upper bound on the random tracking-ID suffix length.
pub const TRACKING_ID_LENGTH_MAX: usize = 20;

/// All tunable parameters of the pricing and submission engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Per-kg rate for the hub-to-destination leg, in EUR
    pub hub_rate_per_kg: f64,
    /// Per-kg rate for the optional local last-mile leg, in EUR
    pub local_delivery_rate_per_kg: f64,
    /// Currency symbol for display only; all amounts are EUR
    pub currency_symbol: String,
    /// From-name used on outbound notifications
    pub email_from_name: String,
    /// From-address used on outbound notifications
    pub email_from_address: String,
    /// Staff address alerted about each new order; no alerts when unset
    pub admin_email: Option<String>,
    /// Fixed prefix of every tracking ID
    pub tracking_id_prefix: String,
    /// Length of the random tracking-ID suffix (5-20)
    pub tracking_id_length: usize,
    /// Price the origin-to-hub leg at zero when no tier covers the weight,
    /// instead of failing with `NoPricingTier` (legacy behavior)
    pub zero_cost_on_missing_tier: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hub_rate_per_kg: 3.50,
            local_delivery_rate_per_kg: 1.00,
            currency_symbol: "\u{20ac}".to_string(),
            email_from_name: "Cargodesk".to_string(),
            email_from_address: "orders@example.com".to_string(),
            admin_email: None,
            tracking_id_prefix: "YCS".to_string(),
            tracking_id_length: 10,
            zero_cost_on_missing_tier: false,
        }
    }
}

impl EngineSettings {
    /// Checks the settings for values the engine cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if !self.hub_rate_per_kg.is_finite() || self.hub_rate_per_kg < 0.0 {
            return Err(Error::Config {
                message: format!("hub_rate_per_kg must be non-negative: {}", self.hub_rate_per_kg),
            });
        }
        if !self.local_delivery_rate_per_kg.is_finite() || self.local_delivery_rate_per_kg < 0.0 {
            return Err(Error::Config {
                message: format!(
                    "local_delivery_rate_per_kg must be non-negative: {}",
                    self.local_delivery_rate_per_kg
                ),
            });
        }
        if !(TRACKING_ID_LENGTH_MIN..=TRACKING_ID_LENGTH_MAX).contains(&self.tracking_id_length) {
            return Err(Error::Config {
                message: format!(
                    "tracking_id_length must be between {TRACKING_ID_LENGTH_MIN} and \
                     {TRACKING_ID_LENGTH_MAX}: {}",
                    self.tracking_id_length
                ),
            });
        }
        Ok(())
    }
}

/// Loads engine settings from a TOML file and validates them.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid, or a
/// value is out of range.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<EngineSettings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    let settings: EngineSettings = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads engine settings from the default location (./settings.toml).
pub fn load_default_settings() -> Result<EngineSettings> {
    load_settings("settings.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            hub_rate_per_kg = 4.25
            local_delivery_rate_per_kg = 0.75
            tracking_id_prefix = "CDX"
            tracking_id_length = 8
        "#;

        let settings: EngineSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.hub_rate_per_kg, 4.25);
        assert_eq!(settings.local_delivery_rate_per_kg, 0.75);
        assert_eq!(settings.tracking_id_prefix, "CDX");
        assert_eq!(settings.tracking_id_length, 8);
        // Omitted keys fall back to defaults
        assert_eq!(settings.currency_symbol, "\u{20ac}");
        assert!(!settings.zero_cost_on_missing_tier);
        assert_eq!(settings.admin_email, None);
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.hub_rate_per_kg, 3.50);
        assert_eq!(settings.local_delivery_rate_per_kg, 1.00);
        assert_eq!(settings.tracking_id_prefix, "YCS");
        assert_eq!(settings.tracking_id_length, 10);
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut settings = EngineSettings {
            tracking_id_length: 4,
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());

        settings.tracking_id_length = 21;
        assert!(settings.validate().is_err());

        settings.tracking_id_length = 5;
        assert!(settings.validate().is_ok());

        settings.hub_rate_per_kg = -1.0;
        assert!(settings.validate().is_err());

        settings.hub_rate_per_kg = f64::NAN;
        assert!(settings.validate().is_err());
    }
}
