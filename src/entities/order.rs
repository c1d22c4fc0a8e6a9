//! Order entity - One submitted shipment with its price snapshot.
//!
//! The tracking ID is immutable once assigned and carries a storage-level
//! unique constraint; the application-side existence check during generation
//! is only an optimization. `price_eur` is the pre-discount subtotal and
//! `final_price_eur = max(0, price_eur - discount_eur)`. `coupon_code` is a
//! snapshot of the code used at submission time, not a live reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The eight stages an order moves through, from intake to delivery.
///
/// Persisted as the historical display strings. The engine does not enforce
/// forward-only transitions; staff may set any stage at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum OrderStatus {
    /// Initial stage, set atomically with order creation
    #[sea_orm(string_value = "Order Confirmed")]
    OrderConfirmed,
    /// Shipment is ready for collection at the sender
    #[sea_orm(string_value = "Ready for Pickup")]
    ReadyForPickup,
    /// Shipment has been collected
    #[sea_orm(string_value = "Picked Up")]
    PickedUp,
    /// On the way to the consolidation hub
    #[sea_orm(string_value = "In Transit to Hub")]
    InTransitToHub,
    /// On the way from the hub to the destination country
    #[sea_orm(string_value = "In Transit to Destination")]
    InTransitToDestination,
    /// Arrived at the destination-country office
    #[sea_orm(string_value = "At Destination Office")]
    AtDestinationOffice,
    /// Out for local delivery to the receiver's home
    #[sea_orm(string_value = "In Transit to Home")]
    InTransitToHome,
    /// Terminal stage
    #[sea_orm(string_value = "Delivered")]
    Delivered,
}

impl OrderStatus {
    /// All stages in workflow order.
    pub const ALL: [Self; 8] = [
        Self::OrderConfirmed,
        Self::ReadyForPickup,
        Self::PickedUp,
        Self::InTransitToHub,
        Self::InTransitToDestination,
        Self::AtDestinationOffice,
        Self::InTransitToHome,
        Self::Delivered,
    ];

    /// The display string persisted to storage and shown to customers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrderConfirmed => "Order Confirmed",
            Self::ReadyForPickup => "Ready for Pickup",
            Self::PickedUp => "Picked Up",
            Self::InTransitToHub => "In Transit to Hub",
            Self::InTransitToDestination => "In Transit to Destination",
            Self::AtDestinationOffice => "At Destination Office",
            Self::InTransitToHome => "In Transit to Home",
            Self::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer-facing tracking identifier, immutable once assigned
    #[sea_orm(unique)]
    pub tracking_id: String,
    /// Destination country
    pub country_id: i64,
    /// Shipment weight in kilograms
    pub weight_kg: f64,
    /// Pre-discount subtotal in EUR
    pub price_eur: f64,
    /// Whether the optional local last-mile leg was requested
    pub sl_delivery: bool,
    /// Coupon code applied at submission time, if any (snapshot)
    pub coupon_code: Option<String>,
    /// Discount applied at submission time, in EUR
    pub discount_eur: f64,
    /// Final price after discount, clamped to zero
    pub final_price_eur: f64,
    /// Sender full name
    pub sender_name: String,
    /// Sender email address, target of order notifications
    pub sender_email: String,
    /// Sender phone number
    pub sender_phone: String,
    /// Sender street address
    pub sender_address: String,
    /// Sender city
    pub sender_city: String,
    /// Sender postal code
    pub sender_postal_code: String,
    /// Sender country name
    pub sender_country: String,
    /// Receiver full name
    pub receiver_name: String,
    /// Receiver phone number
    pub receiver_phone: String,
    /// Receiver street address
    pub receiver_address: String,
    /// Receiver city
    pub receiver_city: String,
    /// Receiver postal code
    pub receiver_postal_code: String,
    /// Current stage; always equals the latest tracking-history entry
    pub status: OrderStatus,
    /// Staff-editable free-text notes, independent of status
    pub special_notes: Option<String>,
    /// When the order was submitted
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order ships to one country
    #[sea_orm(
        belongs_to = "super::country::Entity",
        from = "Column::CountryId",
        to = "super::country::Column::Id"
    )]
    Country,
    /// One order has many tracking-history entries
    #[sea_orm(has_many = "super::tracking_history::Entity")]
    TrackingHistory,
}

impl Related<super::country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

impl Related<super::tracking_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
