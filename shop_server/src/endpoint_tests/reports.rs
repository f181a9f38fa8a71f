use actix_web::{http::StatusCode, test::TestRequest};
use shop_engine::db_types::{Amount, BuyerSummary, OrderStatusType, OrderSummary, RevenueSummary};

use super::helpers::{TestShop, BUYER, TEST_ADMIN_KEY};
use crate::auth::ADMIN_KEY_HEADER;

#[actix_web::test]
async fn buyer_history_and_summary() {
    let shop = TestShop::new().await;
    let product = shop.product("netflix", 50_000, 3).await;
    let paid = shop.place_order(product.id, 1).await;
    let waiting = shop.place_order(product.id, 2).await;
    shop.pay(&paid);
    let (status, _) = shop.send(TestRequest::post().uri(&format!("/orders/{}/check", paid.order_id.value()))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = shop.send(TestRequest::get().uri(&format!("/buyers/{BUYER}/orders"))).await;
    assert_eq!(status, StatusCode::OK);
    let history: Vec<OrderSummary> = serde_json::from_str(&body).unwrap();
    assert_eq!(history.len(), 2);
    // Newest first
    assert_eq!(history[0].order_id, waiting.order_id);
    assert_eq!(history[0].status, OrderStatusType::Pending);
    assert!(history[0].delivered.is_empty());
    assert_eq!(history[1].order_id, paid.order_id);
    assert_eq!(history[1].status, OrderStatusType::Completed);
    assert_eq!(history[1].delivered, vec!["netflix-item-1"]);
    assert_eq!(history[1].product_name.as_deref(), Some("netflix"));

    let (_, body) = shop.send(TestRequest::get().uri(&format!("/buyers/{BUYER}/orders?limit=1"))).await;
    let history: Vec<OrderSummary> = serde_json::from_str(&body).unwrap();
    assert_eq!(history.len(), 1);

    let (status, body) = shop.send(TestRequest::get().uri(&format!("/buyers/{BUYER}/summary"))).await;
    assert_eq!(status, StatusCode::OK);
    let summary: BuyerSummary = serde_json::from_str(&body).unwrap();
    assert_eq!(summary.completed_orders, 1);
    assert_eq!(summary.total_spent, Amount::from(50_000));
    shop.teardown().await;
}

#[actix_web::test]
async fn admin_reports_need_the_key() {
    let shop = TestShop::new().await;
    let product = shop.product("netflix", 50_000, 4).await;
    let order = shop.place_order(product.id, 3).await;
    shop.pay(&order);
    shop.engine.sweep().await;

    let (status, _) = shop.send(TestRequest::get().uri("/admin/revenue")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let req = TestRequest::get().uri("/admin/revenue").insert_header((ADMIN_KEY_HEADER, "guess"));
    let (status, _) = shop.send(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = TestRequest::get().uri("/admin/revenue").insert_header((ADMIN_KEY_HEADER, TEST_ADMIN_KEY));
    let (status, body) = shop.send(req).await;
    assert_eq!(status, StatusCode::OK);
    let revenue: RevenueSummary = serde_json::from_str(&body).unwrap();
    assert_eq!(revenue.completed_orders, 1);
    assert_eq!(revenue.total_revenue, Amount::from(150_000));

    shop.place_order(product.id, 1).await;
    let req = TestRequest::get().uri("/admin/orders?limit=1").insert_header((ADMIN_KEY_HEADER, TEST_ADMIN_KEY));
    let (status, body) = shop.send(req).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<OrderSummary> = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatusType::Pending);
    shop.teardown().await;
}
