//! Core business logic - framework-agnostic pricing and order workflow.
//!
//! Leaf-first: pricing-table lookup and coupon validation feed the price
//! calculator in [`quote`]; the orchestrators in [`order`] compose those with
//! tracking-ID generation and transactional persistence.

/// Country administration (create, list, guarded delete)
pub mod country;
/// Coupon validation and atomic redemption
pub mod coupon;
/// Order submission, tracking, status updates, and notes
pub mod order;
/// Per-country step-function price tables
pub mod pricing;
/// Price calculation (quotes, read-only)
pub mod quote;
/// Order and coupon statistics
pub mod report;
/// Collision-checked tracking identifier generation
pub mod tracking_id;
