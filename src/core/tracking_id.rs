//! Tracking identifier generation.
//!
//! IDs are `prefix + random suffix` where the suffix is uppercase
//! alphanumeric of configured length. Candidates are checked against the
//! order table before use, but that check is only an optimization: the
//! storage-level unique constraint on `orders.tracking_id` is the source of
//! truth, and order submission retries on a constraint violation.
//!
//! After 100 failed attempts the generator falls back to
//! `prefix + current Unix timestamp`. That fallback is a known weak spot of
//! the historical system, kept for compatibility, not a correctness
//! guarantee.

use crate::{
    config::settings::EngineSettings,
    entities::{Order, order},
    errors::Result,
};
use rand::Rng;
use sea_orm::prelude::*;

const SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Attempts before giving up on random suffixes.
pub const MAX_ATTEMPTS: usize = 100;

fn random_suffix(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARSET.len());
            char::from(SUFFIX_CHARSET[idx])
        })
        .collect()
}

/// Generates a tracking ID not currently present in the order table.
pub async fn generate_tracking_id<C>(db: &C, settings: &EngineSettings) -> Result<String>
where
    C: ConnectionTrait,
{
    for _ in 0..MAX_ATTEMPTS {
        let candidate = format!(
            "{}{}",
            settings.tracking_id_prefix,
            random_suffix(settings.tracking_id_length)
        );

        let existing = Order::find()
            .filter(order::Column::TrackingId.eq(&candidate))
            .count(db)
            .await?;
        if existing == 0 {
            return Ok(candidate);
        }
    }

    tracing::warn!(
        attempts = MAX_ATTEMPTS,
        "tracking-id generation exhausted random attempts, using timestamp fallback"
    );
    Ok(format!(
        "{}{}",
        settings.tracking_id_prefix,
        chrono::Utc::now().timestamp()
    ))
}
