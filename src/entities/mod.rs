//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod country;
pub mod coupon;
pub mod order;
pub mod pricing_tier;
pub mod tracking_history;

// Re-export specific types to avoid conflicts
pub use country::{Column as CountryColumn, Entity as Country, Model as CountryModel};
pub use coupon::{Column as CouponColumn, DiscountType, Entity as Coupon, Model as CouponModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus};
pub use pricing_tier::{
    Column as PricingTierColumn, Entity as PricingTier, Model as PricingTierModel,
};
pub use tracking_history::{
    Column as TrackingHistoryColumn, Entity as TrackingHistory, Model as TrackingHistoryModel,
};
