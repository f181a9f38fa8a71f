//! Turns engine events into messages for buyers and admins.
//!
//! Every notification is logged. If a webhook is configured, it is also POSTed there as JSON so that the chat front
//! end can deliver it. Delivery failures are logged and otherwise ignored; the order state is never affected.
use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use log::*;
use serde::{Deserialize, Serialize};
use shop_engine::{
    db_types::ChatAddress,
    events::{
        EventHandlers,
        EventHooks,
        OrderCancelledEvent,
        OrderCompletedEvent,
        OrderExpiredEvent,
        OrderShortfallEvent,
    },
};

use crate::errors::ServerError;

pub const NOTIFICATION_BUFFER_SIZE: usize = 25;
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderCompleted,
    OrderExpired,
    OrderCancelled,
    OrderShortfall,
    /// Sent to admins when an order is completed.
    SaleAlert,
    /// Sent to admins when a paid order could not be filled.
    ShortfallAlert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: ChatAddress,
    pub kind: NotificationKind,
    pub message: String,
    /// Delivered goods, if any.
    #[serde(default)]
    pub payloads: Vec<String>,
}

impl Notification {
    pub fn order_completed(ev: &OrderCompletedEvent) -> Self {
        let order = &ev.order;
        Self {
            recipient: order.chat_address,
            kind: NotificationKind::OrderCompleted,
            message: format!(
                "Payment received for order {}. Here {} your {} item(s):",
                order.id,
                if ev.payloads.len() == 1 { "is" } else { "are" },
                ev.payloads.len()
            ),
            payloads: ev.payloads.clone(),
        }
    }

    pub fn order_expired(ev: &OrderExpiredEvent) -> Self {
        Self {
            recipient: ev.order.chat_address,
            kind: NotificationKind::OrderExpired,
            message: format!(
                "Order {} has expired because no payment of {} with reference {} arrived in time.",
                ev.order.id, ev.order.total_price, ev.order.reference
            ),
            payloads: Vec::new(),
        }
    }

    pub fn order_cancelled(ev: &OrderCancelledEvent) -> Self {
        Self {
            recipient: ev.order.chat_address,
            kind: NotificationKind::OrderCancelled,
            message: format!("Order {} has been cancelled.", ev.order.id),
            payloads: Vec::new(),
        }
    }

    pub fn order_shortfall(ev: &OrderShortfallEvent) -> Self {
        Self {
            recipient: ev.order.chat_address,
            kind: NotificationKind::OrderShortfall,
            message: format!(
                "Payment received for order {}, but we ran out of stock. {} of {} item(s) are below. An admin will \
                 contact you about the remaining {}.",
                ev.order.id,
                ev.delivered.len(),
                ev.requested,
                ev.missing()
            ),
            payloads: ev.delivered.clone(),
        }
    }

    pub fn sale_alert(admin: ChatAddress, ev: &OrderCompletedEvent) -> Self {
        let order = &ev.order;
        Self {
            recipient: admin,
            kind: NotificationKind::SaleAlert,
            message: format!(
                "Sold: order {} by buyer {}. {} x {} for {}.",
                order.id, order.buyer_id, order.quantity, order.product_id, order.total_price
            ),
            payloads: Vec::new(),
        }
    }

    pub fn shortfall_alert(admin: ChatAddress, ev: &OrderShortfallEvent) -> Self {
        let order = &ev.order;
        Self {
            recipient: admin,
            kind: NotificationKind::ShortfallAlert,
            message: format!(
                "SHORTFALL: order {} (buyer {}, {}) paid {} for {} unit(s) of {} but only {} could be delivered. \
                 Restock and restart, or refund manually.",
                order.id,
                order.buyer_id,
                order.chat_address,
                order.total_price,
                ev.requested,
                order.product_id,
                ev.delivered.len()
            ),
            payloads: Vec::new(),
        }
    }
}

/// Sends notifications. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    admins: Arc<Vec<ChatAddress>>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>, admins: Vec<ChatAddress>) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| ServerError::InitializeError(format!("Could not create the notification client. {e}")))?;
        Ok(Self { client, webhook_url, admins: Arc::new(admins) })
    }

    pub fn admins(&self) -> &[ChatAddress] {
        self.admins.as_slice()
    }

    pub async fn send(&self, notification: Notification) {
        info!("📬️ [{:?}] to {}: {}", notification.kind, notification.recipient, notification.message);
        let Some(url) = &self.webhook_url else {
            return;
        };
        match self.client.post(url).json(&notification).send().await {
            Ok(res) if res.status().is_success() => {
                debug!("📬️ Notification for {} delivered to the webhook", notification.recipient)
            },
            Ok(res) => {
                warn!("📬️ The notification webhook rejected a message for {}. {}", notification.recipient, res.status())
            },
            Err(e) => warn!("📬️ Could not reach the notification webhook. {e}"),
        }
    }

    pub async fn send_all(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            self.send(notification).await;
        }
    }
}

/// Registers a hook for every engine event. Buyers hear about their own orders; admins get sale and shortfall alerts.
pub fn create_notification_handlers(notifier: Notifier) -> EventHandlers {
    let mut hooks = EventHooks::default();
    // --- On OrderCompleted Handler ---
    let n = notifier.clone();
    hooks.on_order_completed(move |ev| {
        let mut batch = vec![Notification::order_completed(&ev)];
        batch.extend(n.admins().iter().map(|admin| Notification::sale_alert(*admin, &ev)));
        dispatch(n.clone(), batch)
    });
    // --- On OrderExpired Handler ---
    let n = notifier.clone();
    hooks.on_order_expired(move |ev| dispatch(n.clone(), vec![Notification::order_expired(&ev)]));
    // --- On OrderCancelled Handler ---
    let n = notifier.clone();
    hooks.on_order_cancelled(move |ev| dispatch(n.clone(), vec![Notification::order_cancelled(&ev)]));
    // --- On OrderShortfall Handler ---
    let n = notifier;
    hooks.on_order_shortfall(move |ev| {
        let mut batch = vec![Notification::order_shortfall(&ev)];
        batch.extend(n.admins().iter().map(|admin| Notification::shortfall_alert(*admin, &ev)));
        if n.admins().is_empty() {
            error!("📬️ Order {} is short of stock and there is no admin to alert!", ev.order.id);
        }
        dispatch(n.clone(), batch)
    });
    EventHandlers::new(NOTIFICATION_BUFFER_SIZE, hooks)
}

fn dispatch(notifier: Notifier, batch: Vec<Notification>) -> BoxFuture<'static, ()> {
    Box::pin(async move { notifier.send_all(batch).await })
}
