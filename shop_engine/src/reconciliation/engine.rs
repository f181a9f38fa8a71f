use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db::traits::{ShopBackend, StatusUpdate, StoreError},
    db_types::{NewOrder, Order, OrderId, OrderStatusType, ReferenceToken},
    events::{EventProducers, OrderCancelledEvent, OrderCompletedEvent, OrderExpiredEvent, OrderShortfallEvent},
    gateway::{PaymentGatewayClient, PaymentLedger},
    reconciliation::{
        registry::{Acquisition, PendingRegistry},
        CancelOutcome,
        CheckOutcome,
        EngineConfig,
        SweepReport,
    },
};

/// Owns the pending set and drives every order from `pending` to a terminal state.
///
/// The engine is cheap to clone. Clones share the same pending set, so the background sweep and request handlers can
/// each hold their own copy.
#[derive(Clone)]
pub struct ReconciliationEngine<B, L> {
    db: B,
    gateway: PaymentGatewayClient<L>,
    registry: PendingRegistry,
    config: EngineConfig,
    producers: EventProducers,
}

impl<B, L> Debug for ReconciliationEngine<B, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationEngine ({} pending, timeout {})", self.registry.len(), self.config.order_timeout)
    }
}

impl<B, L> ReconciliationEngine<B, L> {
    pub fn new(db: B, ledger: L, config: EngineConfig, producers: EventProducers) -> Self {
        let gateway = PaymentGatewayClient::new(ledger);
        Self { db, gateway, registry: PendingRegistry::new(), config, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &PendingRegistry {
        &self.registry
    }
}

impl<B, L> ReconciliationEngine<B, L>
where
    B: ShopBackend,
    L: PaymentLedger,
{
    /// Repopulates the pending set from the store. Call once at startup, before the first sweep.
    pub async fn restore(&self) -> Result<usize, StoreError> {
        let orders = self.db.fetch_pending_orders().await?;
        let count = orders.len();
        for order in orders {
            self.registry.insert(order);
        }
        info!("🔄️ Restored {count} pending orders");
        Ok(count)
    }

    /// Stores a new order with a fresh reference token and adds it to the pending set.
    ///
    /// Any reference already set on `order` is replaced. The token is reserved under the registry lock so that
    /// concurrent calls never hand out the same one.
    pub async fn open_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let token = self.registry.reserve_reference();
        match self.db.insert_order(order.with_reference(token.clone())).await {
            Ok(order) => {
                self.registry.insert(order.clone());
                info!("🔄️ Order {} is waiting for {} with reference {}", order.id, order.total_price, order.reference);
                Ok(order)
            },
            Err(e) => {
                self.registry.release_reference(&token);
                Err(e)
            },
        }
    }

    pub async fn check_order(&self, id: OrderId) -> Result<CheckOutcome, StoreError> {
        self.check_order_at(id, Utc::now()).await
    }

    /// Tries to resolve one order as of `now`.
    ///
    /// An order older than the timeout is expired without asking the gateway. Otherwise the gateway is queried and,
    /// on a match, the order is removed from the pending set before any stock is claimed.
    pub async fn check_order_at(&self, id: OrderId, now: DateTime<Utc>) -> Result<CheckOutcome, StoreError> {
        let guard = match self.registry.try_acquire(id) {
            Acquisition::NotPending => return Ok(CheckOutcome::NotFound),
            Acquisition::InFlight => return Ok(CheckOutcome::Processing),
            Acquisition::Acquired(guard) => guard,
        };
        let order = guard.order();
        if order.age(now) > self.config.order_timeout {
            return self.expire(id).await;
        }
        if !self.gateway.find_match(&order.reference, order.total_price).await {
            if !self.registry.contains(id) {
                debug!("🔄️ Order {id} left the pending set while we were checking");
                return Ok(CheckOutcome::NotFound);
            }
            trace!("🔄️ No payment yet for order {id}");
            return Ok(CheckOutcome::StillPending);
        }
        // Membership is re-checked after the gateway call. A cancellation that landed in the meantime wins.
        let Some(order) = self.registry.remove(id) else {
            info!("🔄️ Order {id} was paid but left the pending set while we were checking. Ignoring the payment.");
            return Ok(CheckOutcome::NotFound);
        };
        self.fulfil(order).await
    }

    /// Expires a timed-out order. An order that already holds stock was paid on an earlier attempt, so it is finished
    /// through [`Self::fulfil`] instead: completed if every unit is there, a shortfall otherwise.
    async fn expire(&self, id: OrderId) -> Result<CheckOutcome, StoreError> {
        let Some(order) = self.registry.remove(id) else {
            return Ok(CheckOutcome::NotFound);
        };
        let delivered = match self.db.fetch_delivered(id).await {
            Ok(items) => items.len(),
            Err(e) => {
                self.registry.insert(order);
                return Err(e);
            },
        };
        if delivered > 0 {
            warn!("🔄️ Order {id} timed out but already holds {delivered} items. It was paid and will not be expired.");
            return self.fulfil(order).await;
        }
        match self.db.set_order_status(id, OrderStatusType::Expired).await {
            Ok(StatusUpdate::Updated) => {
                info!("🔄️ Order {id} expired without payment");
                self.call_order_expired_hook(&order).await;
                Ok(CheckOutcome::Expired)
            },
            Ok(StatusUpdate::Unchanged) => Ok(CheckOutcome::Expired),
            Ok(StatusUpdate::Rejected(current)) => {
                warn!("🔄️ Order {id} could not be expired because it is already {current}");
                Ok(CheckOutcome::NotFound)
            },
            Err(e) => {
                // Put it back so that the next sweep tries again.
                self.registry.insert(order);
                Err(e)
            },
        }
    }

    /// Hands over one stock item per unit. `order` has already left the pending set.
    async fn fulfil(&self, order: Order) -> Result<CheckOutcome, StoreError> {
        let id = order.id;
        let previously_delivered = match self.db.fetch_delivered(id).await {
            Ok(items) => items,
            Err(e) => {
                // Nothing new has been claimed, so the order can safely go back to waiting.
                self.registry.insert(order);
                return Err(e);
            },
        };
        if !previously_delivered.is_empty() {
            warn!("🔄️ Order {id} already holds {} items from an earlier attempt", previously_delivered.len());
        }
        let mut payloads = previously_delivered.into_iter().map(|item| item.payload).collect::<Vec<_>>();
        while (payloads.len() as i64) < order.quantity {
            match self.db.claim_one(order.product_id, order.buyer_id, id).await {
                Ok(Some(item)) => {
                    debug!("🔄️ {} handed to order {id}", item.id);
                    payloads.push(item.payload);
                },
                Ok(None) => break,
                Err(e) => {
                    // Items claimed so far stay linked to the order, so the next attempt only claims the rest.
                    error!("🔄️ Could not claim stock for order {id}. It will be retried. {e}");
                    self.registry.insert(order);
                    return Err(e);
                },
            }
        }
        if (payloads.len() as i64) < order.quantity {
            error!(
                "🔄️ SHORTFALL: order {id} was paid for {} units of {} but only {} could be delivered. The order needs \
                 manual attention.",
                order.quantity,
                order.product_id,
                payloads.len()
            );
            let requested = order.quantity;
            self.call_order_shortfall_hook(&order, &payloads).await;
            return Ok(CheckOutcome::Shortfall { delivered: payloads, requested });
        }
        match self.db.set_order_status(id, OrderStatusType::Completed).await {
            Ok(StatusUpdate::Updated) => info!("🔄️ Order {id} is complete. {} items delivered", payloads.len()),
            Ok(update) => warn!("🔄️ Order {id} was delivered but its status update returned {update:?}"),
            // The goods are already claimed, so they must still reach the buyer.
            Err(e) => error!("🔄️ Order {id} was delivered but could not be marked as completed. {e}"),
        }
        self.call_order_completed_hook(&order, &payloads).await;
        Ok(CheckOutcome::Paid { payloads })
    }

    /// Removes the order from the pending set and marks it `cancelled`. Orders that are not pending are reported as
    /// not found.
    pub async fn cancel_order(&self, id: OrderId) -> Result<CancelOutcome, StoreError> {
        let Some(order) = self.registry.remove(id) else {
            return Ok(CancelOutcome::NotFound);
        };
        match self.db.set_order_status(id, OrderStatusType::Cancelled).await {
            Ok(StatusUpdate::Updated) | Ok(StatusUpdate::Unchanged) => {
                info!("🔄️ Order {id} has been cancelled");
                self.call_order_cancelled_hook(&order).await;
                Ok(CancelOutcome::Cancelled)
            },
            Ok(StatusUpdate::Rejected(current)) => {
                warn!("🔄️ Order {id} could not be cancelled because it is already {current}");
                Ok(CancelOutcome::NotFound)
            },
            Err(e) => {
                self.registry.insert(order);
                Err(e)
            },
        }
    }

    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(Utc::now()).await
    }

    /// Checks every pending order once. A failure on one order is logged and does not stop the pass.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();
        for id in self.registry.pending_ids() {
            match self.check_order_at(id, now).await {
                Ok(outcome) => report.record(&outcome),
                Err(e) => {
                    error!("🕰️ Error while checking order {id}. {e}");
                    report.record_failure();
                },
            }
        }
        if report.checked > 0 {
            debug!("🕰️ Sweep complete. {report}");
        }
        report
    }

    /// The reference a buyer must quote for a pending order, if it is pending.
    pub fn pending_reference(&self, id: OrderId) -> Option<ReferenceToken> {
        self.registry.get(id).map(|o| o.reference)
    }

    async fn call_order_completed_hook(&self, order: &Order, payloads: &[String]) {
        for emitter in &self.producers.order_completed_producer {
            debug!("🔄️ Notifying order completed hook subscribers");
            emitter.publish_event(OrderCompletedEvent::new(order.clone(), payloads.to_vec())).await;
        }
    }

    async fn call_order_expired_hook(&self, order: &Order) {
        for emitter in &self.producers.order_expired_producer {
            debug!("🔄️ Notifying order expired hook subscribers");
            emitter.publish_event(OrderExpiredEvent::new(order.clone())).await;
        }
    }

    async fn call_order_cancelled_hook(&self, order: &Order) {
        for emitter in &self.producers.order_cancelled_producer {
            debug!("🔄️ Notifying order cancelled hook subscribers");
            emitter.publish_event(OrderCancelledEvent::new(order.clone())).await;
        }
    }

    async fn call_order_shortfall_hook(&self, order: &Order, delivered: &[String]) {
        for emitter in &self.producers.order_shortfall_producer {
            debug!("🔄️ Notifying order shortfall hook subscribers");
            emitter.publish_event(OrderShortfallEvent::new(order.clone(), delivered.to_vec())).await;
        }
    }
}
