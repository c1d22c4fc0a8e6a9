//! Coupon entity - Discount codes redeemable against an order subtotal.
//!
//! Codes are stored upper-cased and matched case-insensitively. `used_count`
//! only ever grows; redemption increments it with a conditional atomic update
//! so it can never pass `max_uses` (see [`crate::core::coupon`]).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a coupon's `discount_value` is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum DiscountType {
    /// `discount_value` is a flat EUR amount
    #[sea_orm(string_value = "fixed")]
    Fixed,
    /// `discount_value` is a percentage of the subtotal (0-100)
    #[sea_orm(string_value = "percentage")]
    Percentage,
}

/// Coupon database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    /// Unique identifier for the coupon
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Redemption code, upper-cased, unique
    #[sea_orm(unique)]
    pub code: String,
    /// Whether the discount is fixed or percentage-based
    pub discount_type: DiscountType,
    /// Flat EUR amount or percentage, depending on `discount_type`
    pub discount_value: f64,
    /// Minimum order subtotal required to redeem, in EUR
    pub min_order_value: f64,
    /// Maximum number of redemptions, None for unlimited
    pub max_uses: Option<i64>,
    /// Number of successful redemptions so far (never decremented)
    pub used_count: i64,
    /// First day the coupon is valid (inclusive), None for no lower bound
    pub start_date: Option<Date>,
    /// Last day the coupon is valid (inclusive), None for no upper bound
    pub end_date: Option<Date>,
    /// Whether the coupon is currently enabled
    pub is_active: bool,
    /// When the coupon was created
    pub created_at: DateTimeUtc,
    /// When the coupon was last modified
    pub updated_at: DateTimeUtc,
}

/// Coupons reference no other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
