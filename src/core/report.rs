//! Dashboard reporting business logic.
//!
//! This module aggregates order and coupon activity into structured data
//! that admin surfaces can format. All functions are framework-agnostic and
//! read-only.

use crate::{
    config::settings::EngineSettings,
    entities::{Coupon, Order, OrderStatus, coupon, order},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, prelude::*};

/// Order count for a single workflow stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    /// The workflow stage
    pub status: OrderStatus,
    /// Orders currently at that stage
    pub count: u64,
}

/// Aggregate coupon activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponStats {
    /// Coupons defined, active or not
    pub total: u64,
    /// Coupons currently marked active
    pub active: u64,
    /// Redemptions across all coupons
    pub total_redemptions: u64,
}

/// A full dashboard snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    /// Orders placed, all time
    pub total_orders: u64,
    /// Per-stage counts, in workflow order; every stage appears even at zero
    pub status_counts: Vec<StatusCount>,
    /// Sum of final prices charged, all time
    pub total_revenue: f64,
    /// Coupon activity summary
    pub coupon_stats: CouponStats,
}

/// Generates the admin dashboard snapshot.
///
/// Counts are taken per stage so the breakdown always lists all eight
/// stages, including those with no orders.
pub async fn generate_dashboard_report(db: &DatabaseConnection) -> Result<DashboardReport> {
    let total_orders = Order::find().count(db).await?;

    let mut status_counts = Vec::with_capacity(OrderStatus::ALL.len());
    for status in OrderStatus::ALL {
        let count = Order::find()
            .filter(order::Column::Status.eq(status))
            .count(db)
            .await?;
        status_counts.push(StatusCount { status, count });
    }

    let total_revenue = Order::find()
        .select_only()
        .column_as(order::Column::FinalPriceEur.sum(), "revenue")
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(0.0);

    let coupon_stats = generate_coupon_stats(db).await?;

    Ok(DashboardReport {
        total_orders,
        status_counts,
        total_revenue,
        coupon_stats,
    })
}

/// Sums revenue for orders placed in the given date range, both ends
/// inclusive.
pub async fn revenue_between(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<f64> {
    let window_start = from.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let window_end = to
        .succ_opt()
        .unwrap_or(to)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();

    let revenue = Order::find()
        .select_only()
        .column_as(order::Column::FinalPriceEur.sum(), "revenue")
        .filter(order::Column::CreatedAt.gte(window_start))
        .filter(order::Column::CreatedAt.lt(window_end))
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(0.0);

    Ok(revenue)
}

/// Aggregates coupon counts and redemptions.
pub async fn generate_coupon_stats(db: &DatabaseConnection) -> Result<CouponStats> {
    let total = Coupon::find().count(db).await?;
    let active = Coupon::find()
        .filter(coupon::Column::IsActive.eq(true))
        .count(db)
        .await?;

    let total_redemptions = Coupon::find()
        .select_only()
        .column_as(coupon::Column::UsedCount.sum(), "redemptions")
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(0)
        .max(0)
        .unsigned_abs();

    Ok(CouponStats {
        total,
        active,
        total_redemptions,
    })
}

/// Returns the most recently placed orders, newest first.
pub async fn recent_orders(db: &DatabaseConnection, limit: u64) -> Result<Vec<order::Model>> {
    Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Formats an amount with the configured currency symbol, e.g. `€66.50`.
#[must_use]
pub fn format_money(settings: &EngineSettings, amount: f64) -> String {
    format!("{}{amount:.2}", settings.currency_symbol)
}

/// One-line order summary for dashboard listings.
#[must_use]
pub fn format_order_summary(settings: &EngineSettings, order: &order::Model) -> String {
    format!(
        "{} | {} | {:.2} kg | {}",
        order.tracking_id,
        order.status,
        order.weight_kg,
        format_money(settings, order.final_price_eur)
    )
}
