//! Coupon business logic - validation and atomic redemption.
//!
//! Validation is pure: it reads the coupon and reports whether it could be
//! applied to a subtotal, without touching `used_count`. Quotes only ever
//! validate. Redemption happens exactly once per successful submission and
//! collapses the re-check of `max_uses` and the increment into a single
//! conditional `UPDATE ... WHERE used_count < max_uses`, so concurrent
//! submissions racing the last remaining use cannot overshoot the limit.

use crate::{
    entities::{Coupon, DiscountType, coupon},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, Set, prelude::*};

/// Why a coupon could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No active coupon with this code exists
    UnknownCode,
    /// Today is before the coupon's start date
    NotStarted,
    /// Today is after the coupon's end date
    Expired,
    /// The order subtotal is below the coupon's minimum
    BelowMinimum,
    /// The coupon has reached its maximum number of uses
    Exhausted,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::UnknownCode => "Invalid or expired coupon code.",
            Self::NotStarted => "This coupon is not valid yet.",
            Self::Expired => "This coupon has expired.",
            Self::BelowMinimum => "The order total is below this coupon's minimum.",
            Self::Exhausted => "This coupon has reached its usage limit.",
        };
        f.write_str(message)
    }
}

/// Outcome of validating (or redeeming) a coupon code against a subtotal.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponOutcome {
    /// No code was supplied; no discount, no message
    NotRequested,
    /// The coupon applies
    Applied {
        /// The matched code, upper-cased
        code: String,
        /// Discount amount in EUR (before the final clamp to zero)
        discount: f64,
    },
    /// The coupon does not apply; discount is zero
    Rejected {
        /// Why it was rejected
        reason: RejectReason,
    },
}

impl CouponOutcome {
    /// Discount this outcome contributes, in EUR.
    pub fn discount(&self) -> f64 {
        match self {
            Self::Applied { discount, .. } => *discount,
            Self::NotRequested | Self::Rejected { .. } => 0.0,
        }
    }

    /// The code that was applied, if any.
    pub fn applied_code(&self) -> Option<&str> {
        match self {
            Self::Applied { code, .. } => Some(code),
            Self::NotRequested | Self::Rejected { .. } => None,
        }
    }

    /// Customer-facing message, `None` when no code was requested.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NotRequested => None,
            Self::Applied { code, .. } => {
                Some(format!("Coupon \"{code}\" applied successfully."))
            }
            Self::Rejected { reason } => Some(reason.to_string()),
        }
    }
}

/// Internal evaluation result carrying the matched row for redemption.
enum Evaluation {
    NotRequested,
    Eligible { coupon: coupon::Model, discount: f64 },
    Ineligible(RejectReason),
}

impl Evaluation {
    fn into_outcome(self) -> CouponOutcome {
        match self {
            Self::NotRequested => CouponOutcome::NotRequested,
            Self::Eligible { coupon, discount } => CouponOutcome::Applied {
                code: coupon.code,
                discount,
            },
            Self::Ineligible(reason) => CouponOutcome::Rejected { reason },
        }
    }
}

/// Finds an active coupon by code, matched case-insensitively.
pub async fn get_coupon_by_code<C>(db: &C, code: &str) -> Result<Option<coupon::Model>>
where
    C: ConnectionTrait,
{
    Coupon::find()
        .filter(coupon::Column::Code.eq(code.trim().to_uppercase()))
        .filter(coupon::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

fn compute_discount(coupon: &coupon::Model, subtotal: f64) -> f64 {
    match coupon.discount_type {
        DiscountType::Fixed => coupon.discount_value,
        DiscountType::Percentage => subtotal * (coupon.discount_value / 100.0),
    }
}

async fn evaluate_coupon<C>(
    db: &C,
    code: Option<&str>,
    subtotal: f64,
    today: NaiveDate,
) -> Result<Evaluation>
where
    C: ConnectionTrait,
{
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(Evaluation::NotRequested);
    };

    let Some(coupon) = get_coupon_by_code(db, code).await? else {
        return Ok(Evaluation::Ineligible(RejectReason::UnknownCode));
    };

    if coupon.start_date.is_some_and(|start| today < start) {
        return Ok(Evaluation::Ineligible(RejectReason::NotStarted));
    }
    if coupon.end_date.is_some_and(|end| today > end) {
        return Ok(Evaluation::Ineligible(RejectReason::Expired));
    }
    if subtotal < coupon.min_order_value {
        return Ok(Evaluation::Ineligible(RejectReason::BelowMinimum));
    }
    if coupon.max_uses.is_some_and(|max| coupon.used_count >= max) {
        return Ok(Evaluation::Ineligible(RejectReason::Exhausted));
    }

    let discount = compute_discount(&coupon, subtotal);
    Ok(Evaluation::Eligible { coupon, discount })
}

/// Validates a coupon code against a subtotal for a given day.
///
/// Read-only: quoting a price any number of times never changes
/// `used_count`. Use [`redeem_coupon_on`] at submission time.
pub async fn validate_coupon_on<C>(
    db: &C,
    code: Option<&str>,
    subtotal: f64,
    today: NaiveDate,
) -> Result<CouponOutcome>
where
    C: ConnectionTrait,
{
    Ok(evaluate_coupon(db, code, subtotal, today).await?.into_outcome())
}

/// Validates a coupon code against a subtotal using the server-local date.
pub async fn validate_coupon<C>(db: &C, code: Option<&str>, subtotal: f64) -> Result<CouponOutcome>
where
    C: ConnectionTrait,
{
    validate_coupon_on(db, code, subtotal, chrono::Local::now().date_naive()).await
}

/// Validates and redeems a coupon in one step, for a given day.
///
/// On eligibility the usage counter is bumped with a single conditional
/// atomic update (`used_count = used_count + 1 WHERE max_uses IS NULL OR
/// used_count < max_uses`). If the update matches no row another submission
/// took the last use in the meantime; the outcome degrades to
/// `Rejected(Exhausted)` and no discount is granted.
pub async fn redeem_coupon_on<C>(
    db: &C,
    code: Option<&str>,
    subtotal: f64,
    today: NaiveDate,
) -> Result<CouponOutcome>
where
    C: ConnectionTrait,
{
    let evaluation = evaluate_coupon(db, code, subtotal, today).await?;
    let Evaluation::Eligible { coupon, discount } = evaluation else {
        return Ok(evaluation.into_outcome());
    };

    let update = Coupon::update_many()
        .col_expr(
            coupon::Column::UsedCount,
            Expr::col(coupon::Column::UsedCount).add(1),
        )
        .filter(coupon::Column::Id.eq(coupon.id))
        .filter(
            Condition::any()
                .add(coupon::Column::MaxUses.is_null())
                .add(Expr::col(coupon::Column::UsedCount).lt(Expr::col(coupon::Column::MaxUses))),
        )
        .exec(db)
        .await?;

    if update.rows_affected == 0 {
        return Ok(CouponOutcome::Rejected {
            reason: RejectReason::Exhausted,
        });
    }

    Ok(CouponOutcome::Applied {
        code: coupon.code,
        discount,
    })
}

/// Validates and redeems a coupon using the server-local date.
pub async fn redeem_coupon<C>(db: &C, code: Option<&str>, subtotal: f64) -> Result<CouponOutcome>
where
    C: ConnectionTrait,
{
    redeem_coupon_on(db, code, subtotal, chrono::Local::now().date_naive()).await
}

/// Creates a new coupon, performing input validation.
///
/// The code is stored upper-cased; a duplicate code is rejected.
#[allow(clippy::too_many_arguments)]
pub async fn create_coupon(
    db: &DatabaseConnection,
    code: String,
    discount_type: DiscountType,
    discount_value: f64,
    min_order_value: f64,
    max_uses: Option<i64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_active: bool,
) -> Result<coupon::Model> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(Error::Config {
            message: "Coupon code cannot be empty".to_string(),
        });
    }
    if !discount_value.is_finite() || discount_value <= 0.0 {
        return Err(Error::Config {
            message: format!("Coupon discount value must be positive: {discount_value}"),
        });
    }
    if discount_type == DiscountType::Percentage && discount_value > 100.0 {
        return Err(Error::Config {
            message: format!("Percentage discount cannot exceed 100: {discount_value}"),
        });
    }
    if !min_order_value.is_finite() || min_order_value < 0.0 {
        return Err(Error::Config {
            message: format!("Minimum order value must be non-negative: {min_order_value}"),
        });
    }
    if max_uses.is_some_and(|max| max <= 0) {
        return Err(Error::Config {
            message: "Maximum uses must be positive when set".to_string(),
        });
    }
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(Error::Config {
                message: format!("Coupon start date {start} is after end date {end}"),
            });
        }
    }

    let now = chrono::Utc::now();
    let model = coupon::ActiveModel {
        code: Set(code.clone()),
        discount_type: Set(discount_type),
        discount_value: Set(discount_value),
        min_order_value: Set(min_order_value),
        max_uses: Set(max_uses),
        used_count: Set(0),
        start_date: Set(start_date),
        end_date: Set(end_date),
        is_active: Set(is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(db).await.map_err(|e| {
        if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
            Error::DuplicateCoupon { code }
        } else {
            e.into()
        }
    })
}

/// Deletes a coupon by ID.
///
/// Orders keep their stored `coupon_code` snapshot; deleting a coupon never
/// rewrites history.
pub async fn delete_coupon(db: &DatabaseConnection, coupon_id: i64) -> Result<()> {
    Coupon::delete_by_id(coupon_id).exec(db).await?;
    Ok(())
}

/// Activates or deactivates a coupon without touching its other fields.
pub async fn set_coupon_active(
    db: &DatabaseConnection,
    coupon_id: i64,
    is_active: bool,
) -> Result<coupon::Model> {
    let existing = Coupon::find_by_id(coupon_id)
        .one(db)
        .await?
        .ok_or(Error::CouponNotFound { id: coupon_id })?;

    let mut active: coupon::ActiveModel = existing.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{create_test_coupon, setup_test_db, today};

    #[tokio::test]
    async fn test_code_matched_case_insensitively_and_stored_uppercase() -> Result<()> {
        let db = setup_test_db().await?;
        let coupon = create_test_coupon(&db, "save10", DiscountType::Percentage, 10.0).await?;
        assert_eq!(coupon.code, "SAVE10");

        let outcome = validate_coupon_on(&db, Some("sAvE10"), 100.0, today()).await?;
        assert_eq!(outcome.discount(), 10.0);
        assert_eq!(outcome.applied_code(), Some("SAVE10"));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_code_means_no_coupon() -> Result<()> {
        let db = setup_test_db().await?;

        let outcome = validate_coupon_on(&db, None, 100.0, today()).await?;
        assert_eq!(outcome, CouponOutcome::NotRequested);
        assert!(outcome.message().is_none());

        let outcome = validate_coupon_on(&db, Some("   "), 100.0, today()).await?;
        assert_eq!(outcome, CouponOutcome::NotRequested);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_codes_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let outcome = validate_coupon_on(&db, Some("NOPE"), 100.0, today()).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::UnknownCode
            }
        );

        create_coupon(
            &db,
            "OFF".to_string(),
            DiscountType::Fixed,
            5.0,
            0.0,
            None,
            None,
            None,
            false, // inactive
        )
        .await?;
        let outcome = validate_coupon_on(&db, Some("OFF"), 100.0, today()).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::UnknownCode
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_date_window_inclusive_bounds() -> Result<()> {
        let db = setup_test_db().await?;
        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        create_coupon(
            &db,
            "JUNE".to_string(),
            DiscountType::Fixed,
            5.0,
            0.0,
            None,
            Some(start),
            Some(end),
            true,
        )
        .await?;

        let before = NaiveDate::from_ymd_opt(2026, 5, 31).unwrap();
        let outcome = validate_coupon_on(&db, Some("JUNE"), 100.0, before).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::NotStarted
            }
        );

        // Both bounds are inclusive
        assert_eq!(
            validate_coupon_on(&db, Some("JUNE"), 100.0, start).await?.discount(),
            5.0
        );
        assert_eq!(
            validate_coupon_on(&db, Some("JUNE"), 100.0, end).await?.discount(),
            5.0
        );

        let after = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let outcome = validate_coupon_on(&db, Some("JUNE"), 100.0, after).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::Expired
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_minimum_order_value_enforced() -> Result<()> {
        let db = setup_test_db().await?;
        create_coupon(
            &db,
            "FIXED5".to_string(),
            DiscountType::Fixed,
            5.0,
            100.0,
            None,
            None,
            None,
            true,
        )
        .await?;

        let outcome = validate_coupon_on(&db, Some("FIXED5"), 66.50, today()).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::BelowMinimum
            }
        );
        assert_eq!(outcome.discount(), 0.0);
        assert!(outcome.message().is_some());

        // At the minimum it applies
        let outcome = validate_coupon_on(&db, Some("FIXED5"), 100.0, today()).await?;
        assert_eq!(outcome.discount(), 5.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_percentage_discount_computed_from_subtotal() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_coupon(&db, "SAVE10", DiscountType::Percentage, 10.0).await?;

        let outcome = validate_coupon_on(&db, Some("SAVE10"), 66.50, today()).await?;
        assert_eq!(outcome.discount(), 6.65);

        Ok(())
    }

    #[tokio::test]
    async fn test_validation_never_increments_usage() -> Result<()> {
        let db = setup_test_db().await?;
        let coupon = create_test_coupon(&db, "SAVE10", DiscountType::Percentage, 10.0).await?;

        for _ in 0..5 {
            validate_coupon_on(&db, Some("SAVE10"), 100.0, today()).await?;
        }

        let reloaded = Coupon::find_by_id(coupon.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.used_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_increments_exactly_once() -> Result<()> {
        let db = setup_test_db().await?;
        let coupon = create_test_coupon(&db, "SAVE10", DiscountType::Percentage, 10.0).await?;

        let outcome = redeem_coupon_on(&db, Some("SAVE10"), 100.0, today()).await?;
        assert_eq!(outcome.discount(), 10.0);

        let reloaded = Coupon::find_by_id(coupon.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.used_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_rejected_past_max_uses() -> Result<()> {
        let db = setup_test_db().await?;
        let coupon = create_coupon(
            &db,
            "TWICE".to_string(),
            DiscountType::Fixed,
            5.0,
            0.0,
            Some(2),
            None,
            None,
            true,
        )
        .await?;

        assert_eq!(
            redeem_coupon_on(&db, Some("TWICE"), 50.0, today()).await?.discount(),
            5.0
        );
        assert_eq!(
            redeem_coupon_on(&db, Some("TWICE"), 50.0, today()).await?.discount(),
            5.0
        );

        // Third redemption attempt must fail and leave the counter at the cap
        let outcome = redeem_coupon_on(&db, Some("TWICE"), 50.0, today()).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::Exhausted
            }
        );

        let reloaded = Coupon::find_by_id(coupon.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.used_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_conditional_update_guards_the_cap() -> Result<()> {
        // Simulate the race: the counter moves after evaluation would have
        // passed. The conditional update must refuse the increment.
        let db = setup_test_db().await?;
        let coupon = create_coupon(
            &db,
            "ONCE".to_string(),
            DiscountType::Fixed,
            5.0,
            0.0,
            Some(1),
            None,
            None,
            true,
        )
        .await?;

        // Pre-consume the only use behind the evaluator's back
        Coupon::update_many()
            .col_expr(coupon::Column::UsedCount, Expr::value(1))
            .filter(coupon::Column::Id.eq(coupon.id))
            .exec(&db)
            .await?;

        let outcome = redeem_coupon_on(&db, Some("ONCE"), 50.0, today()).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::Exhausted
            }
        );

        let reloaded = Coupon::find_by_id(coupon.id).one(&db).await?.unwrap();
        assert_eq!(reloaded.used_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_coupon(
            &db,
            "  ".to_string(),
            DiscountType::Fixed,
            5.0,
            0.0,
            None,
            None,
            None,
            true,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_coupon(
            &db,
            "BAD".to_string(),
            DiscountType::Percentage,
            120.0,
            0.0,
            None,
            None,
            None,
            true,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_coupon(
            &db,
            "BAD".to_string(),
            DiscountType::Fixed,
            5.0,
            0.0,
            Some(0),
            None,
            None,
            true,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_duplicate_code_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_coupon(&db, "SAVE10", DiscountType::Percentage, 10.0).await?;

        // Same code in different case collides with the stored uppercase form
        let result = create_coupon(
            &db,
            "save10".to_string(),
            DiscountType::Fixed,
            3.0,
            0.0,
            None,
            None,
            None,
            true,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateCoupon { code } if code == "SAVE10"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_coupon_frees_its_code() -> Result<()> {
        let db = setup_test_db().await?;
        let coupon = create_test_coupon(&db, "SAVE10", DiscountType::Percentage, 10.0).await?;

        delete_coupon(&db, coupon.id).await?;
        assert!(get_coupon_by_code(&db, "SAVE10").await?.is_none());

        // The code can be reused afterwards
        create_test_coupon(&db, "SAVE10", DiscountType::Fixed, 5.0).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_set_coupon_active_toggles_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let coupon = create_test_coupon(&db, "SAVE10", DiscountType::Percentage, 10.0).await?;

        set_coupon_active(&db, coupon.id, false).await?;
        let outcome = validate_coupon(&db, Some("SAVE10"), 100.0).await?;
        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                reason: RejectReason::UnknownCode
            }
        );

        set_coupon_active(&db, coupon.id, true).await?;
        let outcome = validate_coupon(&db, Some("SAVE10"), 100.0).await?;
        assert_eq!(outcome.discount(), 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_coupon_active_unknown_id() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_coupon_active(&db, 999, true).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::CouponNotFound { id: 999 }
        ));

        Ok(())
    }
}
