use std::collections::HashMap;

use cucumber::World;
use shop_engine::{
    db_types::{OrderId, Product},
    events::EventProducers,
    order_objects::OrderCreated,
    payment_objects::PaymentDisplayConfig,
    test_utils::{prepare_env::new_test_database, MockLedger},
    CheckOutcome,
    EngineConfig,
    OrderFlowApi,
    OrderFlowError,
    ReconciliationEngine,
    SqliteDatabase,
};

#[derive(Default, Debug, World)]
pub struct ShopWorld {
    pub system: Option<ShopSystem>,
    pub products: HashMap<String, Product>,
    /// Orders by the label used in the feature file
    pub orders: HashMap<String, OrderCreated>,
    pub last_outcome: Option<CheckOutcome>,
    pub last_error: Option<OrderFlowError>,
}

pub struct ShopSystem {
    pub api: OrderFlowApi<SqliteDatabase, MockLedger>,
    pub ledger: MockLedger,
}

impl std::fmt::Debug for ShopSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ShopSystem ({:?})", self.api)
    }
}

impl ShopSystem {
    pub async fn new() -> Self {
        let db = new_test_database().await;
        let ledger = MockLedger::new();
        let engine = ReconciliationEngine::new(db, ledger.clone(), EngineConfig::default(), EventProducers::default());
        let api = OrderFlowApi::new(engine, PaymentDisplayConfig::default());
        Self { api, ledger }
    }
}

impl ShopWorld {
    pub async fn system(&mut self) -> &ShopSystem {
        if self.system.is_none() {
            self.system = Some(ShopSystem::new().await);
        }
        self.system.as_ref().expect("System was just initialised")
    }

    pub fn api(&self) -> &OrderFlowApi<SqliteDatabase, MockLedger> {
        &self.system.as_ref().expect("Shop system not initialised").api
    }

    pub fn ledger(&self) -> &MockLedger {
        &self.system.as_ref().expect("Shop system not initialised").ledger
    }

    pub fn product(&self, name: &str) -> &Product {
        self.products.get(name).unwrap_or_else(|| panic!("Product {name} has not been set up"))
    }

    pub fn order(&self, label: &str) -> &OrderCreated {
        self.orders.get(label).unwrap_or_else(|| panic!("Order {label} has not been placed"))
    }

    pub fn order_id(&self, label: &str) -> OrderId {
        self.order(label).order_id
    }
}
