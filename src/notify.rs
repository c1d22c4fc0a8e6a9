//! Order lifecycle events and the notification seam.
//!
//! Persistence success and delivery success are decoupled: orchestrators
//! commit their transaction first, then emit an [`OrderEvent`] through a
//! [`Notifier`]. Dispatch is fire-and-forget - a failing notifier is logged
//! and swallowed, never surfaced to the caller.

use crate::config::settings::EngineSettings;
use crate::entities::OrderStatus;
use crate::errors::Result;

/// Something that happened to an order and is worth telling someone about.
///
/// Most events go to the order's sender; [`OrderEvent::NewOrderAlert`] goes
/// to the configured staff address instead.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    /// A new order was persisted
    OrderCreated {
        /// Tracking ID of the new order
        tracking_id: String,
        /// Sender email address the notification goes to
        recipient: String,
        /// Pre-discount subtotal in EUR
        subtotal: f64,
        /// Discount applied in EUR
        discount: f64,
        /// Final price in EUR
        total: f64,
    },
    /// A new order came in; alerts the staff address, not the customer
    NewOrderAlert {
        /// Tracking ID of the new order
        tracking_id: String,
        /// Staff email address the alert goes to
        recipient: String,
        /// Name of the person who placed the order
        sender_name: String,
        /// Destination country, English name
        country: String,
        /// Shipment weight in kilograms
        weight_kg: f64,
        /// Final price in EUR
        total: f64,
    },
    /// Staff moved an order to a new stage
    StatusChanged {
        /// Tracking ID of the order
        tracking_id: String,
        /// Sender email address the notification goes to
        recipient: String,
        /// The stage the order entered
        status: OrderStatus,
        /// Free-text notes recorded with the change
        notes: Option<String>,
    },
}

impl OrderEvent {
    /// The email address the event should be delivered to.
    pub fn recipient(&self) -> &str {
        match self {
            Self::OrderCreated { recipient, .. }
            | Self::NewOrderAlert { recipient, .. }
            | Self::StatusChanged { recipient, .. } => recipient,
        }
    }

    /// Subject line for the outbound message.
    pub fn subject(&self) -> String {
        match self {
            Self::OrderCreated { tracking_id, .. } => {
                format!("Order Confirmation - {tracking_id}")
            }
            Self::NewOrderAlert { tracking_id, .. } => {
                format!("New Order Received - {tracking_id}")
            }
            Self::StatusChanged { tracking_id, .. } => format!("Order Update - {tracking_id}"),
        }
    }

    /// Plain-text body for the outbound message.
    pub fn body(&self, settings: &EngineSettings) -> String {
        let currency = &settings.currency_symbol;
        match self {
            Self::OrderCreated {
                tracking_id,
                subtotal,
                discount,
                total,
                ..
            } => format!(
                "Your order has been placed successfully.\n\n\
                 Tracking ID: {tracking_id}\n\
                 Subtotal: {currency}{subtotal:.2}\n\
                 Discount: {currency}{discount:.2}\n\
                 Total: {currency}{total:.2}\n\n\
                 Use the tracking ID above to follow your shipment."
            ),
            Self::NewOrderAlert {
                tracking_id,
                sender_name,
                country,
                weight_kg,
                total,
                ..
            } => format!(
                "A new order has been received.\n\n\
                 Tracking ID: {tracking_id}\n\
                 Sender: {sender_name}\n\
                 Destination: {country}\n\
                 Weight: {weight_kg:.2} kg\n\
                 Total: {currency}{total:.2}"
            ),
            Self::StatusChanged {
                tracking_id,
                status,
                notes,
                ..
            } => {
                let mut body = format!(
                    "Your shipment {tracking_id} has a new status: {status}."
                );
                if let Some(notes) = notes.as_deref().filter(|n| !n.is_empty()) {
                    body.push_str("\n\nNotes: ");
                    body.push_str(notes);
                }
                body
            }
        }
    }
}

/// Delivery seam for order notifications.
///
/// Implementations send the event somewhere (mail relay, queue, log). Errors
/// are reported back so [`dispatch`] can log them, but they never fail the
/// surrounding request.
pub trait Notifier: Send + Sync {
    /// Delivers one event.
    async fn notify(&self, settings: &EngineSettings, event: OrderEvent) -> Result<()>;
}

/// Notifier that writes events to the tracing log.
///
/// Stands in for a real mail relay in development and small deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, settings: &EngineSettings, event: OrderEvent) -> Result<()> {
        tracing::info!(
            from = %settings.email_from_address,
            to = %event.recipient(),
            subject = %event.subject(),
            "order notification"
        );
        tracing::debug!(body = %event.body(settings), "order notification body");
        Ok(())
    }
}

/// Dispatches an event, logging and swallowing any delivery failure.
pub async fn dispatch<N: Notifier>(notifier: &N, settings: &EngineSettings, event: OrderEvent) {
    let subject = event.subject();
    if let Err(error) = notifier.notify(settings, event).await {
        tracing::warn!(%subject, %error, "notification dispatch failed, order is unaffected");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::test_settings;

    #[test]
    fn test_created_event_rendering() {
        let event = OrderEvent::OrderCreated {
            tracking_id: "YCS4F7K2M9QX".to_string(),
            recipient: "sender@example.com".to_string(),
            subtotal: 66.50,
            discount: 6.65,
            total: 59.85,
        };

        assert_eq!(event.subject(), "Order Confirmation - YCS4F7K2M9QX");
        assert_eq!(event.recipient(), "sender@example.com");

        let body = event.body(&test_settings());
        assert!(body.contains("YCS4F7K2M9QX"));
        assert!(body.contains("66.50"));
        assert!(body.contains("59.85"));
    }

    #[test]
    fn test_admin_alert_rendering() {
        let event = OrderEvent::NewOrderAlert {
            tracking_id: "YCS4F7K2M9QX".to_string(),
            recipient: "staff@example.com".to_string(),
            sender_name: "Anna Rossi".to_string(),
            country: "Italy".to_string(),
            weight_kg: 7.0,
            total: 66.50,
        };

        assert_eq!(event.subject(), "New Order Received - YCS4F7K2M9QX");
        assert_eq!(event.recipient(), "staff@example.com");

        let body = event.body(&test_settings());
        assert!(body.contains("Anna Rossi"));
        assert!(body.contains("Italy"));
        assert!(body.contains("7.00 kg"));
        assert!(body.contains("\u{20ac}66.50"));
    }

    #[test]
    fn test_status_event_rendering() {
        let event = OrderEvent::StatusChanged {
            tracking_id: "YCS4F7K2M9QX".to_string(),
            recipient: "sender@example.com".to_string(),
            status: OrderStatus::PickedUp,
            notes: Some("Collected at 9am".to_string()),
        };

        assert_eq!(event.subject(), "Order Update - YCS4F7K2M9QX");
        let body = event.body(&test_settings());
        assert!(body.contains("Picked Up"));
        assert!(body.contains("Collected at 9am"));

        let bare = OrderEvent::StatusChanged {
            tracking_id: "YCS4F7K2M9QX".to_string(),
            recipient: "sender@example.com".to_string(),
            status: OrderStatus::Delivered,
            notes: None,
        };
        assert!(!bare.body(&test_settings()).contains("Notes:"));
    }

    #[tokio::test]
    async fn test_dispatch_swallows_notifier_errors() {
        struct FailingNotifier;
        impl Notifier for FailingNotifier {
            async fn notify(&self, _: &EngineSettings, _: OrderEvent) -> Result<()> {
                Err(crate::errors::Error::Config {
                    message: "relay unreachable".to_string(),
                })
            }
        }

        // Must not panic or propagate
        dispatch(
            &FailingNotifier,
            &test_settings(),
            OrderEvent::StatusChanged {
                tracking_id: "YCS1".to_string(),
                recipient: "sender@example.com".to_string(),
                status: OrderStatus::Delivered,
                notes: None,
            },
        )
        .await;
    }
}
