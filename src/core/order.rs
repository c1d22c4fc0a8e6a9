//! Order workflow - submission, tracking, status updates, and staff notes.
//!
//! Submission is the only write path that touches money: it re-prices the
//! shipment inside a single database transaction, redeems the coupon
//! atomically, and inserts the order together with its first
//! tracking-history row. If any step fails the transaction rolls back, so a
//! failed submission leaves no order, no history row, and no coupon
//! increment behind. Notifications go out only after commit and never fail
//! the request.

use crate::{
    config::settings::EngineSettings,
    core::{coupon, country, quote, tracking_id},
    entities::{Order, OrderStatus, TrackingHistory, order, tracking_history},
    errors::{Error, Result},
    notify::{self, Notifier, OrderEvent},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};

/// Insert attempts before giving up on a colliding tracking ID.
///
/// The generator already avoids existing IDs; a constraint violation here
/// means two submissions raced the same candidate in the same instant.
const TRACKING_INSERT_ATTEMPTS: usize = 3;

/// System note recorded with the initial tracking-history entry.
const ORDER_PLACED_NOTE: &str = "Order placed successfully.";

/// Sender address block of an order form.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderDetails {
    /// Full name
    pub name: String,
    /// Email address, target of order notifications
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Postal code
    pub postal_code: String,
    /// Country name
    pub country: String,
}

/// Receiver address block of an order form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverDetails {
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Postal code
    pub postal_code: String,
}

/// Everything a customer submits to place an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    /// Destination country
    pub country_id: i64,
    /// Shipment weight in kilograms
    pub weight_kg: f64,
    /// Whether the optional local last-mile leg is requested
    pub sl_delivery: bool,
    /// Coupon code, if the customer entered one
    pub coupon_code: Option<String>,
    /// Sender address block
    pub sender: SenderDetails,
    /// Receiver address block
    pub receiver: ReceiverDetails,
}

impl OrderForm {
    /// Checks that every required field is present and well-formed.
    ///
    /// Fails with [`Error::Validation`] before any side effect occurs.
    pub fn validate(&self) -> Result<()> {
        if self.country_id <= 0 {
            return Err(Error::Validation {
                message: "A destination country is required".to_string(),
            });
        }
        quote::check_weight(self.weight_kg)?;

        let required = [
            ("sender name", &self.sender.name),
            ("sender email", &self.sender.email),
            ("sender phone", &self.sender.phone),
            ("sender address", &self.sender.address),
            ("sender city", &self.sender.city),
            ("sender postal code", &self.sender.postal_code),
            ("sender country", &self.sender.country),
            ("receiver name", &self.receiver.name),
            ("receiver phone", &self.receiver.phone),
            ("receiver address", &self.receiver.address),
            ("receiver city", &self.receiver.city),
            ("receiver postal code", &self.receiver.postal_code),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Validation {
                    message: format!("Missing required field: {label}"),
                });
            }
        }

        if !self.sender.email.contains('@') {
            return Err(Error::Validation {
                message: format!("Invalid sender email address: {}", self.sender.email),
            });
        }

        Ok(())
    }
}

/// An order together with its full tracking history, oldest entry first.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedOrder {
    /// The order snapshot
    pub order: order::Model,
    /// Append-only status log, ascending by time
    pub history: Vec<tracking_history::Model>,
}

/// Submits an order, pricing it as of the given day.
///
/// See [`submit_order`]; the explicit date exists so coupon date windows can
/// be tested deterministically.
pub async fn submit_order_on<N: Notifier>(
    db: &DatabaseConnection,
    settings: &EngineSettings,
    notifier: &N,
    form: OrderForm,
    today: NaiveDate,
) -> Result<order::Model> {
    form.validate()?;

    let txn = db.begin().await?;

    let country = country::get_country_by_id(&txn, form.country_id)
        .await?
        .ok_or(Error::CountryNotFound {
            id: form.country_id,
        })?;

    // Re-price inside the transaction; the customer's earlier quote was
    // informational only.
    let origin_to_hub =
        quote::origin_to_hub_cost(&txn, settings, form.country_id, form.weight_kg).await?;
    let hub_to_destination = form.weight_kg * settings.hub_rate_per_kg;
    let local_delivery_cost = if form.sl_delivery {
        form.weight_kg * settings.local_delivery_rate_per_kg
    } else {
        0.0
    };
    let subtotal = origin_to_hub + hub_to_destination + local_delivery_cost;

    // Redemption validates and increments used_count in one conditional
    // update; rolling back the transaction undoes the increment.
    let coupon_outcome =
        coupon::redeem_coupon_on(&txn, form.coupon_code.as_deref(), subtotal, today).await?;
    let discount = coupon_outcome.discount();
    let total = (subtotal - discount).max(0.0);

    let now = chrono::Utc::now();
    let mut inserted = None;
    for _ in 0..TRACKING_INSERT_ATTEMPTS {
        let candidate_id = tracking_id::generate_tracking_id(&txn, settings).await?;
        let candidate = order::ActiveModel {
            tracking_id: Set(candidate_id),
            country_id: Set(form.country_id),
            weight_kg: Set(form.weight_kg),
            price_eur: Set(subtotal),
            sl_delivery: Set(form.sl_delivery),
            coupon_code: Set(coupon_outcome.applied_code().map(ToString::to_string)),
            discount_eur: Set(discount),
            final_price_eur: Set(total),
            sender_name: Set(form.sender.name.clone()),
            sender_email: Set(form.sender.email.clone()),
            sender_phone: Set(form.sender.phone.clone()),
            sender_address: Set(form.sender.address.clone()),
            sender_city: Set(form.sender.city.clone()),
            sender_postal_code: Set(form.sender.postal_code.clone()),
            sender_country: Set(form.sender.country.clone()),
            receiver_name: Set(form.receiver.name.clone()),
            receiver_phone: Set(form.receiver.phone.clone()),
            receiver_address: Set(form.receiver.address.clone()),
            receiver_city: Set(form.receiver.city.clone()),
            receiver_postal_code: Set(form.receiver.postal_code.clone()),
            status: Set(OrderStatus::OrderConfirmed),
            special_notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match candidate.insert(&txn).await {
            Ok(order) => {
                inserted = Some(order);
                break;
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::debug!("tracking ID collided at insert, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }
    let order = inserted.ok_or(Error::TrackingIdExhausted {
        attempts: TRACKING_INSERT_ATTEMPTS,
    })?;

    let initial_entry = tracking_history::ActiveModel {
        order_id: Set(order.id),
        status: Set(OrderStatus::OrderConfirmed),
        notes: Set(Some(ORDER_PLACED_NOTE.to_string())),
        created_at: Set(now),
        ..Default::default()
    };
    initial_entry.insert(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        tracking_id = %order.tracking_id,
        country_id = order.country_id,
        total = order.final_price_eur,
        "order submitted"
    );

    notify::dispatch(
        notifier,
        settings,
        OrderEvent::OrderCreated {
            tracking_id: order.tracking_id.clone(),
            recipient: order.sender_email.clone(),
            subtotal: order.price_eur,
            discount: order.discount_eur,
            total: order.final_price_eur,
        },
    )
    .await;

    if let Some(admin) = settings.admin_email.as_deref() {
        notify::dispatch(
            notifier,
            settings,
            OrderEvent::NewOrderAlert {
                tracking_id: order.tracking_id.clone(),
                recipient: admin.to_string(),
                sender_name: order.sender_name.clone(),
                country: country.name_en,
                weight_kg: order.weight_kg,
                total: order.final_price_eur,
            },
        )
        .await;
    }

    Ok(order)
}

/// Submits an order: validates the form, prices and persists it atomically,
/// and dispatches a confirmation notification after commit.
///
/// Returns the persisted order carrying its tracking ID.
pub async fn submit_order<N: Notifier>(
    db: &DatabaseConnection,
    settings: &EngineSettings,
    notifier: &N,
    form: OrderForm,
) -> Result<order::Model> {
    submit_order_on(db, settings, notifier, form, chrono::Local::now().date_naive()).await
}

/// Looks up an order by tracking ID along with its full history.
pub async fn track_order(db: &DatabaseConnection, tracking_id: &str) -> Result<TrackedOrder> {
    let tracking_id = tracking_id.trim();
    let order = Order::find()
        .filter(order::Column::TrackingId.eq(tracking_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            reference: tracking_id.to_string(),
        })?;

    let history = TrackingHistory::find()
        .filter(tracking_history::Column::OrderId.eq(order.id))
        .order_by_asc(tracking_history::Column::CreatedAt)
        .order_by_asc(tracking_history::Column::Id)
        .all(db)
        .await?;

    Ok(TrackedOrder { order, history })
}

/// Finds an order by its numeric ID (staff surfaces).
pub async fn get_order_by_id(db: &DatabaseConnection, order_id: i64) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Moves an order to a new stage, appending a tracking-history row.
///
/// The engine deliberately does not enforce forward-only transitions; staff
/// may set any of the eight stages at any time. A status-update notification
/// goes out after commit.
pub async fn update_order_status<N: Notifier>(
    db: &DatabaseConnection,
    settings: &EngineSettings,
    notifier: &N,
    order_id: i64,
    status: OrderStatus,
    notes: Option<String>,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            reference: order_id.to_string(),
        })?;

    let now = chrono::Utc::now();
    let mut active: order::ActiveModel = order.into();
    active.status = Set(status);
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    let entry = tracking_history::ActiveModel {
        order_id: Set(updated.id),
        status: Set(status),
        notes: Set(notes.clone().filter(|n| !n.trim().is_empty())),
        created_at: Set(now),
        ..Default::default()
    };
    entry.insert(&txn).await?;

    txn.commit().await?;

    tracing::info!(tracking_id = %updated.tracking_id, %status, "order status updated");

    notify::dispatch(
        notifier,
        settings,
        OrderEvent::StatusChanged {
            tracking_id: updated.tracking_id.clone(),
            recipient: updated.sender_email.clone(),
            status,
            notes,
        },
    )
    .await;

    Ok(updated)
}

/// Replaces an order's staff notes.
///
/// Independent of the status workflow: touches neither `status` nor the
/// tracking history, and sends no notification.
pub async fn update_order_notes(
    db: &DatabaseConnection,
    order_id: i64,
    notes: String,
) -> Result<order::Model> {
    let order = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            reference: order_id.to_string(),
        })?;

    let trimmed = notes.trim();
    let mut active: order::ActiveModel = order.into();
    active.special_notes = Set(if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    });
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await.map_err(Into::into)
}
