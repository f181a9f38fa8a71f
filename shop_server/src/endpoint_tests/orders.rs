use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::json;
use shop_engine::{
    db_types::{Amount, Order, OrderStatusType, Product},
    CheckOutcome,
};

use super::helpers::{TestShop, BUYER};

#[actix_web::test]
async fn health_check() {
    let shop = TestShop::new().await;
    let (status, body) = shop.send(TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
    shop.teardown().await;
}

#[actix_web::test]
async fn order_is_paid_and_delivered() {
    let shop = TestShop::new().await;
    let product = shop.product("netflix", 50_000, 3).await;
    let order = shop.place_order(product.id, 2).await;
    assert_eq!(order.total_price, Amount::from(100_000));
    assert_eq!(order.unit_price, Amount::from(50_000));
    assert_eq!(order.reference.as_str().len(), 8);
    assert_eq!(order.payment.memo, order.reference);
    assert!(order.payment.qr_url.contains(order.reference.as_str()));
    assert!(order.payment.qr_url.contains("970436-0071000888888-compact2.png"));

    let check = format!("/orders/{}/check", order.order_id.value());
    let (status, body) = shop.send(TestRequest::post().uri(&check)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<CheckOutcome>(&body).unwrap(), CheckOutcome::StillPending);

    shop.pay(&order);
    let (status, body) = shop.send(TestRequest::post().uri(&check)).await;
    assert_eq!(status, StatusCode::OK);
    match serde_json::from_str::<CheckOutcome>(&body).unwrap() {
        CheckOutcome::Paid { payloads } => assert_eq!(payloads, vec!["netflix-item-1", "netflix-item-2"]),
        other => panic!("Expected the order to be paid, got {other}"),
    }

    // Resolved orders are no longer waiting for payment
    let (status, _) = shop.send(TestRequest::post().uri(&check)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = shop.send(TestRequest::get().uri(&format!("/orders/{}", order.order_id.value()))).await;
    assert_eq!(status, StatusCode::OK);
    let stored: Order = serde_json::from_str(&body).unwrap();
    assert_eq!(stored.status, OrderStatusType::Completed);

    let (status, body) = shop.send(TestRequest::get().uri("/products")).await;
    assert_eq!(status, StatusCode::OK);
    let products: Vec<Product> = serde_json::from_str(&body).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].available, 1);

    let (status, body) = shop.send(TestRequest::get().uri(&format!("/products/{}", product.id.value()))).await;
    assert_eq!(status, StatusCode::OK);
    let stored: Product = serde_json::from_str(&body).unwrap();
    assert_eq!(stored.name, "netflix");
    assert_eq!(stored.available, 1);
    let (status, body) = shop.send(TestRequest::get().uri("/products/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Product product-999 was not found."}"#);
    shop.teardown().await;
}

#[actix_web::test]
async fn invalid_orders_are_rejected_with_a_message() {
    let shop = TestShop::new().await;
    let product = shop.product("spotify", 30_000, 3).await;
    let cases = [
        (product.id.value(), 0, "Please order at least one item."),
        (product.id.value(), 6, "You can buy at most 5 items in one order."),
        (product.id.value(), 4, "Only 3 items are left in stock."),
        (999, 1, "That product is not available."),
    ];
    for (product_id, quantity, message) in cases {
        let req = TestRequest::post().uri("/orders").set_json(json!({
            "buyer_id": BUYER,
            "chat_address": BUYER,
            "product_id": product_id,
            "quantity": quantity
        }));
        let (status, body) = shop.send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": message }).to_string());
    }
    let (status, _) = shop.send(TestRequest::post().uri("/orders").set_json(json!({ "quantity": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // Nothing was stored
    let (_, body) = shop.send(TestRequest::get().uri(&format!("/buyers/{BUYER}/orders"))).await;
    assert_eq!(body, "[]");
    shop.teardown().await;
}

#[actix_web::test]
async fn cancelled_orders_stop_waiting() {
    let shop = TestShop::new().await;
    let product = shop.product("youtube", 20_000, 2).await;
    let order = shop.place_order(product.id, 1).await;
    let cancel = format!("/orders/{}/cancel", order.order_id.value());

    let (status, body) = shop.send(TestRequest::post().uri(&cancel)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"cancelled"}"#);

    let (status, body) = shop.send(TestRequest::post().uri(&cancel)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": format!("Order {} is not awaiting payment.", order.order_id) }).to_string());

    // A late payment does not revive the order
    shop.pay(&order);
    let (status, _) = shop.send(TestRequest::post().uri(&format!("/orders/{}/check", order.order_id.value()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = shop.send(TestRequest::get().uri(&format!("/orders/{}", order.order_id.value()))).await;
    let stored: Order = serde_json::from_str(&body).unwrap();
    assert_eq!(stored.status, OrderStatusType::Cancelled);
    shop.teardown().await;
}

#[actix_web::test]
async fn unknown_order() {
    let shop = TestShop::new().await;
    let (status, body) = shop.send(TestRequest::get().uri("/orders/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r##"{"error":"Order #999 was not found."}"##);
    let (status, _) = shop.send(TestRequest::post().uri("/orders/999/check")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    shop.teardown().await;
}
