use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use serde_json::json;
use shop_common::Secret;
use shop_engine::{
    db_types::{Product, ProductId},
    events::EventProducers,
    order_objects::OrderCreated,
    payment_objects::PaymentDisplayConfig,
    test_utils::{
        prepare_env::{drop_test_database, new_test_database, seed_product},
        MockLedger,
    },
    EngineConfig,
    OrderFlowApi,
    ReconciliationEngine,
    ReportsApi,
    SqliteDatabase,
};

use crate::{auth::AdminAuth, routes::configure_routes};

pub const TEST_ADMIN_KEY: &str = "test-admin-key";
pub const BUYER: i64 = 7;

/// A migrated throwaway database, an in-memory bank ledger and an engine wired to both.
pub struct TestShop {
    pub db: SqliteDatabase,
    pub ledger: MockLedger,
    pub engine: ReconciliationEngine<SqliteDatabase, MockLedger>,
}

impl TestShop {
    pub async fn new() -> Self {
        let _ = env_logger::try_init();
        let db = new_test_database().await;
        let ledger = MockLedger::new();
        let engine =
            ReconciliationEngine::new(db.clone(), ledger.clone(), EngineConfig::default(), EventProducers::default());
        Self { db, ledger, engine }
    }

    pub async fn product(&self, name: &str, price: i64, stock: usize) -> Product {
        seed_product(&self.db, name, price, stock).await
    }

    pub async fn teardown(self) {
        drop_test_database(self.db).await;
    }

    /// Runs one request against a fresh app instance and returns the status and body.
    pub async fn send(&self, req: TestRequest) -> (StatusCode, String) {
        let display = PaymentDisplayConfig {
            bank_bin: "970436".into(),
            bank_account: "0071000888888".into(),
            bank_name: "Vietcombank".into(),
            account_owner: "SHOP OWNER".into(),
        };
        let app = App::new()
            .app_data(web::Data::new(OrderFlowApi::new(self.engine.clone(), display)))
            .app_data(web::Data::new(ReportsApi::new(self.db.clone())))
            .app_data(web::Data::new(AdminAuth::new(Secret::new(TEST_ADMIN_KEY.to_string()))))
            .configure(configure_routes::<SqliteDatabase, MockLedger>);
        let service = test::init_service(app).await;
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    pub async fn place_order(&self, product_id: ProductId, quantity: i64) -> OrderCreated {
        let req = TestRequest::post().uri("/orders").set_json(json!({
            "buyer_id": BUYER,
            "chat_address": BUYER,
            "product_id": product_id,
            "quantity": quantity
        }));
        let (status, body) = self.send(req).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        serde_json::from_str(&body).expect("Body was not an OrderCreated")
    }

    /// Makes the bank report a transfer for `order`, with the usual banking noise around the reference.
    pub fn pay(&self, order: &OrderCreated) {
        self.ledger.receive(&format!("MBVCB.3278907687.{}.CT tu 0123", order.reference), order.total_price.value());
    }
}
