//! Tracking history entity - Append-only status log per order.
//!
//! One entry is written atomically with every order ("Order Confirmed") and
//! with every subsequent status change. Entries are never mutated or deleted;
//! they are the audit trail, and the owning order's current status must
//! always equal the status of its most recent entry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::order::OrderStatus;

/// Tracking history database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracking_history")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order this entry belongs to
    pub order_id: i64,
    /// Stage the order entered
    pub status: OrderStatus,
    /// Optional free-text notes recorded with the change
    pub notes: Option<String>,
    /// When the entry was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between TrackingHistory and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
