//! Unified error types for the cargo engine.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants map to
//! the failure classes the engine distinguishes: caller mistakes (validation,
//! unknown references), configuration gaps (no pricing tier covering a
//! weight), and storage failures.

use thiserror::Error;

/// All errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or unreadable configuration (settings file, seed data, coupon setup).
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// A required order-form field was empty or malformed. No side effects occur.
    #[error("Validation failed: {message}")]
    Validation {
        /// Which field or rule was violated
        message: String,
    },

    /// Requested weight is not a positive finite number of kilograms.
    #[error("Invalid weight: {weight} kg")]
    InvalidWeight {
        /// The offending weight value
        weight: f64,
    },

    /// Referenced country does not exist.
    #[error("Country {id} not found")]
    CountryNotFound {
        /// Primary key that was looked up
        id: i64,
    },

    /// Country deletion rejected because orders still reference it.
    #[error("Country {id} is referenced by {order_count} order(s) and cannot be deleted")]
    CountryInUse {
        /// Primary key of the country
        id: i64,
        /// Number of referencing orders
        order_count: u64,
    },

    /// No pricing tier covers the requested weight for the country.
    ///
    /// The legacy system silently priced the origin-to-hub leg at zero in this
    /// case; that behavior is only available behind
    /// `EngineSettings::zero_cost_on_missing_tier`.
    #[error("No pricing tier covers {weight} kg for country {country_id}")]
    NoPricingTier {
        /// Country whose table was searched
        country_id: i64,
        /// Requested shipment weight
        weight: f64,
    },

    /// A pricing tier already exists for this (country, weight) pair.
    #[error("Country {country_id} already has a pricing tier at {weight} kg")]
    DuplicateTier {
        /// Country the tier belongs to
        country_id: i64,
        /// Upper-bound weight of the duplicate tier
        weight: f64,
    },

    /// Referenced coupon does not exist.
    #[error("Coupon {id} not found")]
    CouponNotFound {
        /// Primary key that was looked up
        id: i64,
    },

    /// A coupon with this code already exists.
    #[error("Coupon code {code:?} already exists")]
    DuplicateCoupon {
        /// The conflicting code (upper-cased)
        code: String,
    },

    /// Referenced order does not exist.
    #[error("Order {reference:?} not found")]
    OrderNotFound {
        /// Tracking ID or numeric ID the caller supplied
        reference: String,
    },

    /// Order insertion kept colliding on the tracking-id unique constraint.
    #[error("Could not allocate a unique tracking ID after {attempts} attempts")]
    TrackingIdExhausted {
        /// How many insert attempts were made
        attempts: usize,
    },

    /// Underlying storage failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (settings file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
