use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::ShopBackend,
    db_types::{NewOrder, OrderId},
    gateway::PaymentLedger,
    reconciliation::{CancelOutcome, CheckOutcome, ReconciliationEngine},
    shop_api::{
        errors::OrderFlowError,
        order_objects::{NewOrderRequest, OrderCreated},
        payment_objects::PaymentDisplayConfig,
    },
};

/// `OrderFlowApi` is the entry point for everything a buyer does with an order: placing it, asking whether it has
/// been paid, and cancelling it.
pub struct OrderFlowApi<B, L> {
    engine: ReconciliationEngine<B, L>,
    display: PaymentDisplayConfig,
}

impl<B, L> Debug for OrderFlowApi<B, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.engine)
    }
}

impl<B, L> OrderFlowApi<B, L> {
    pub fn new(engine: ReconciliationEngine<B, L>, display: PaymentDisplayConfig) -> Self {
        Self { engine, display }
    }

    pub fn engine(&self) -> &ReconciliationEngine<B, L> {
        &self.engine
    }
}

impl<B, L> OrderFlowApi<B, L>
where
    B: ShopBackend,
    L: PaymentLedger,
{
    /// Validates the request, snapshots the price and opens a pending order.
    ///
    /// Nothing is written if validation fails. Stock is not reserved at this point; it is only claimed once payment
    /// arrives.
    pub async fn create_order(&self, request: NewOrderRequest) -> Result<OrderCreated, OrderFlowError> {
        let quantity = request.quantity;
        if quantity < 1 {
            return Err(OrderFlowError::InvalidQuantity(quantity));
        }
        let max = self.engine.config().max_order_quantity;
        if quantity > max {
            return Err(OrderFlowError::QuantityLimit { requested: quantity, max });
        }
        let product = self
            .engine
            .db()
            .fetch_product(request.product_id)
            .await?
            .ok_or(OrderFlowError::ProductNotFound(request.product_id))?;
        if product.available < quantity {
            return Err(OrderFlowError::InsufficientStock { requested: quantity, available: product.available });
        }
        let total_price = product.price.checked_mul(quantity).ok_or(OrderFlowError::PriceOverflow)?;
        let new_order = NewOrder::new(request.buyer_id, request.chat_address, product.id, quantity, total_price);
        let order = self.engine.open_order(new_order).await?;
        debug!("🔄️📦️ Order {} created for buyer {} ({} x {})", order.id, order.buyer_id, quantity, product.name);
        let payment = self.display.instructions_for(order.total_price, &order.reference);
        Ok(OrderCreated {
            order_id: order.id,
            reference: order.reference,
            product_name: product.name,
            quantity,
            unit_price: product.price,
            total_price: order.total_price,
            expires_at: order.created_at + self.engine.config().order_timeout,
            payment,
        })
    }

    /// The buyer-triggered recheck. Shares its locking with the background sweep, so a concurrent call reports
    /// [`CheckOutcome::Processing`] instead of resolving the order twice.
    pub async fn check_order(&self, order_id: OrderId) -> Result<CheckOutcome, OrderFlowError> {
        let outcome = self.engine.check_order(order_id).await?;
        debug!("🔄️💰️ Check of order {order_id}: {outcome}");
        Ok(outcome)
    }

    pub async fn cancel_order(&self, order_id: OrderId) -> Result<CancelOutcome, OrderFlowError> {
        let outcome = self.engine.cancel_order(order_id).await?;
        Ok(outcome)
    }
}
