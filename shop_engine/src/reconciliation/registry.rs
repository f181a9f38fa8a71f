//! The in-memory set of orders that are waiting for payment, and the markers for orders that are currently being
//! resolved.
//!
//! Both live behind one lock so that "is this order pending?" and "is anyone else resolving it?" are answered
//! atomically. The lock is a plain `std::sync::Mutex` and is never held across an `.await`.
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::*;

use crate::{
    db_types::{Order, OrderId, ReferenceToken},
    helpers::generate_reference,
};

#[derive(Debug, Default)]
struct RegistryState {
    pending: HashMap<OrderId, Order>,
    in_flight: HashSet<OrderId>,
    /// Tokens handed out to orders that are being created but are not yet in `pending`.
    reserved: HashSet<ReferenceToken>,
}

impl RegistryState {
    fn is_token_taken(&self, token: &ReferenceToken) -> bool {
        self.reserved.contains(token) || self.pending.values().any(|o| &o.reference == token)
    }
}

/// Result of [`PendingRegistry::try_acquire`].
#[derive(Debug)]
pub enum Acquisition {
    /// The order is not in the pending set.
    NotPending,
    /// Someone else is resolving the order right now.
    InFlight,
    Acquired(ResolutionGuard),
}

#[derive(Debug, Clone, Default)]
pub struct PendingRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // The state is a pair of sets that are only touched in short, non-panicking critical sections, so a poisoned
        // lock still holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds (or replaces) a pending order. Any reservation for its token is released.
    pub fn insert(&self, order: Order) {
        let mut state = self.lock();
        state.reserved.remove(&order.reference);
        state.pending.insert(order.id, order);
    }

    /// Removes an order from the pending set, returning it if it was there. Exactly one caller wins the removal.
    pub fn remove(&self, id: OrderId) -> Option<Order> {
        self.lock().pending.remove(&id)
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.lock().pending.get(&id).cloned()
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.lock().pending.contains_key(&id)
    }

    /// Pending order ids, oldest first.
    pub fn pending_ids(&self) -> Vec<OrderId> {
        let state = self.lock();
        let mut orders = state.pending.values().map(|o| (o.created_at, o.id)).collect::<Vec<_>>();
        orders.sort();
        orders.into_iter().map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_in_flight(&self, id: OrderId) -> bool {
        self.lock().in_flight.contains(&id)
    }

    /// Atomically checks that the order is pending and that nobody else is resolving it, and marks it as being
    /// resolved. The marker is cleared when the returned guard is dropped.
    pub fn try_acquire(&self, id: OrderId) -> Acquisition {
        let mut state = self.lock();
        let Some(order) = state.pending.get(&id).cloned() else {
            return Acquisition::NotPending;
        };
        if !state.in_flight.insert(id) {
            trace!("🔄️ Order {id} is already being resolved");
            return Acquisition::InFlight;
        }
        Acquisition::Acquired(ResolutionGuard { state: Arc::clone(&self.state), order })
    }

    /// Generates a reference token that no pending order uses and that has not been handed out to an order still
    /// being created. The token stays reserved until [`Self::insert`] or [`Self::release_reference`] is called.
    pub fn reserve_reference(&self) -> ReferenceToken {
        let mut state = self.lock();
        let token = generate_reference(|t| state.is_token_taken(t));
        state.reserved.insert(token.clone());
        token
    }

    pub fn release_reference(&self, token: &ReferenceToken) {
        self.lock().reserved.remove(token);
    }
}

/// Proof that the holder is the only one resolving `order`. Dropping it clears the marker, including on early returns
/// and errors.
#[derive(Debug)]
pub struct ResolutionGuard {
    state: Arc<Mutex<RegistryState>>,
    order: Order,
}

impl ResolutionGuard {
    /// A snapshot of the pending order, taken when the guard was acquired.
    pub fn order(&self) -> &Order {
        &self.order
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.remove(&self.order.id);
        trace!("🔄️ Released resolution marker for order {}", self.order.id);
    }
}

#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::db_types::{Amount, BuyerId, ChatAddress, OrderStatusType, ProductId};

    fn order(id: i64, token: &str, minutes_ago: i64) -> Order {
        let created_at = Utc::now() - Duration::minutes(minutes_ago);
        Order {
            id: OrderId(id),
            buyer_id: BuyerId(7),
            chat_address: ChatAddress(7),
            product_id: ProductId(1),
            quantity: 1,
            total_price: Amount::from(10_000),
            reference: ReferenceToken::new(token),
            status: OrderStatusType::Pending,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn only_one_resolver_at_a_time() {
        let registry = PendingRegistry::new();
        registry.insert(order(1, "AAAA1111", 0));
        let guard = match registry.try_acquire(OrderId(1)) {
            Acquisition::Acquired(g) => g,
            other => panic!("Expected to acquire order 1, got {other:?}"),
        };
        assert_eq!(guard.order().id, OrderId(1));
        assert!(matches!(registry.try_acquire(OrderId(1)), Acquisition::InFlight));
        assert!(registry.is_in_flight(OrderId(1)));
        drop(guard);
        assert!(!registry.is_in_flight(OrderId(1)));
        assert!(matches!(registry.try_acquire(OrderId(1)), Acquisition::Acquired(_)));
    }

    #[test]
    fn unknown_orders_cannot_be_acquired() {
        let registry = PendingRegistry::new();
        assert!(matches!(registry.try_acquire(OrderId(99)), Acquisition::NotPending));
        assert!(!registry.is_in_flight(OrderId(99)));
    }

    #[test]
    fn marker_is_released_when_the_resolver_panics() {
        let registry = PendingRegistry::new();
        registry.insert(order(1, "AAAA1111", 0));
        let r2 = registry.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = r2.try_acquire(OrderId(1));
            panic!("resolution failed");
        });
        assert!(result.is_err());
        assert!(!registry.is_in_flight(OrderId(1)));
        assert!(registry.contains(OrderId(1)));
    }

    #[test]
    fn removal_has_a_single_winner() {
        let registry = PendingRegistry::new();
        registry.insert(order(1, "AAAA1111", 0));
        assert!(registry.remove(OrderId(1)).is_some());
        assert!(registry.remove(OrderId(1)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn pending_ids_are_oldest_first() {
        let registry = PendingRegistry::new();
        registry.insert(order(3, "CCCC3333", 1));
        registry.insert(order(1, "AAAA1111", 10));
        registry.insert(order(2, "BBBB2222", 5));
        assert_eq!(registry.pending_ids(), vec![OrderId(1), OrderId(2), OrderId(3)]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn reserved_tokens_are_unique() {
        let registry = PendingRegistry::new();
        registry.insert(order(1, "AAAA1111", 0));
        let tokens = (0..500).map(|_| registry.reserve_reference()).collect::<HashSet<_>>();
        assert_eq!(tokens.len(), 500);
        assert!(!tokens.contains(&ReferenceToken::new("AAAA1111")));
        let token = tokens.into_iter().next().unwrap();
        registry.release_reference(&token);
        assert!(!registry.lock().reserved.contains(&token));
    }
}
