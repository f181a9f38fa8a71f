use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use cucumber::{given, then, when};
use shop_engine::{
    db_types::{BuyerId, ChatAddress, OrderStatusType},
    order_objects::NewOrderRequest,
    test_utils::prepare_env::seed_product,
    CancelOutcome,
    CheckOutcome,
    OrderStore,
    ProductCatalog,
    StockLedger,
};

use crate::cucumber::ShopWorld;

#[given(expr = "a product {string} priced at {int} VND with {int} items in stock")]
async fn add_product(world: &mut ShopWorld, name: String, price: i64, stock: usize) {
    let system = world.system().await;
    let product = seed_product(system.api.engine().db(), &name, price, stock).await;
    world.products.insert(name, product);
}

#[when(expr = "buyer {int} orders {int} of {string} as {word}")]
async fn place_order(world: &mut ShopWorld, buyer: i64, quantity: i64, product: String, label: String) {
    let request = NewOrderRequest {
        buyer_id: BuyerId(buyer),
        chat_address: ChatAddress(buyer),
        product_id: world.product(&product).id,
        quantity,
    };
    let created = world.api().create_order(request).await.expect("Error creating order");
    world.orders.insert(label, created);
}

#[when(expr = "buyer {int} tries to order {int} of {string}")]
async fn try_order(world: &mut ShopWorld, buyer: i64, quantity: i64, product: String) {
    let request = NewOrderRequest {
        buyer_id: BuyerId(buyer),
        chat_address: ChatAddress(buyer),
        product_id: world.product(&product).id,
        quantity,
    };
    world.last_error = world.api().create_order(request).await.err();
}

#[when(expr = "the bank receives {int} VND with memo {string} for {word}")]
async fn receive_payment_with_memo(world: &mut ShopWorld, amount: i64, memo: String, label: String) {
    let reference = world.order(&label).reference.clone();
    let memo = memo.replace("<ref>", reference.as_str());
    world.ledger().receive(&memo, amount);
}

#[when(expr = "the bank receives {int} VND for {word}")]
async fn receive_payment(world: &mut ShopWorld, amount: i64, label: String) {
    let reference = world.order(&label).reference.clone();
    world.ledger().receive(reference.as_str(), amount);
}

#[when("the bank is unreachable")]
async fn bank_down(world: &mut ShopWorld) {
    world.ledger().set_failing(true);
}

#[when("the bank is reachable again")]
async fn bank_up(world: &mut ShopWorld) {
    world.ledger().set_failing(false);
}

#[when(expr = "the bank takes {int}ms to answer")]
async fn bank_latency(world: &mut ShopWorld, ms: u64) {
    world.ledger().set_latency(StdDuration::from_millis(ms));
}

#[when(expr = "the buyer checks {word}")]
async fn check(world: &mut ShopWorld, label: String) {
    let id = world.order_id(&label);
    world.last_outcome = Some(world.api().check_order(id).await.expect("Error checking order"));
}

#[when(expr = "the buyer cancels {word}")]
async fn cancel(world: &mut ShopWorld, label: String) {
    let id = world.order_id(&label);
    let outcome = world.api().cancel_order(id).await.expect("Error cancelling order");
    assert_eq!(outcome, CancelOutcome::Cancelled);
}

#[when(expr = "the sweep runs {int} minutes from now")]
async fn sweep_later(world: &mut ShopWorld, minutes: i64) {
    world.api().engine().sweep_at(Utc::now() + Duration::minutes(minutes)).await;
}

#[when(expr = "the buyer checks {word} twice at once")]
async fn check_twice(world: &mut ShopWorld, label: String) {
    let id = world.order_id(&label);
    let api = world.api();
    let (first, second) = tokio::join!(api.check_order(id), async {
        tokio::time::sleep(StdDuration::from_millis(20)).await;
        api.check_order(id).await
    });
    let first = first.expect("Error checking order");
    let second = second.expect("Error checking order");
    assert_eq!(second, CheckOutcome::Processing, "The second check should have found the order busy");
    world.last_outcome = Some(first);
}

#[when(expr = "the price of {string} changes to {int} VND")]
async fn change_price(world: &mut ShopWorld, name: String, price: i64) {
    let id = world.product(&name).id;
    world.api().engine().db().update_product_price(id, price.into()).await.expect("Error updating price");
}

#[then(expr = "the check reports {string}")]
async fn check_reports(world: &mut ShopWorld, expected: String) {
    let outcome = world.last_outcome.as_ref().expect("No order has been checked");
    let actual = match outcome {
        CheckOutcome::NotFound => "not found",
        CheckOutcome::Processing => "processing",
        CheckOutcome::StillPending => "still pending",
        CheckOutcome::Paid { .. } => "paid",
        CheckOutcome::Expired => "expired",
        CheckOutcome::Shortfall { .. } => "shortfall",
    };
    assert_eq!(actual, expected);
}

#[then(expr = "the buyer received {int} items")]
async fn received_items(world: &mut ShopWorld, count: usize) {
    match world.last_outcome.as_ref().expect("No order has been checked") {
        CheckOutcome::Paid { payloads } => assert_eq!(payloads.len(), count),
        CheckOutcome::Shortfall { delivered, .. } => assert_eq!(delivered.len(), count),
        other => panic!("The buyer received nothing. The last check reported {other}"),
    }
}

#[then(expr = "{word} is {word}")]
async fn order_status(world: &mut ShopWorld, label: String, status: String) {
    let id = world.order_id(&label);
    let expected = status.parse::<OrderStatusType>().expect("Not a valid order status");
    let order = world.api().engine().db().fetch_order(id).await.expect("Error fetching order").expect("No such order");
    assert_eq!(order.status, expected);
}

#[then(expr = "{word} costs {int} VND")]
async fn order_total(world: &mut ShopWorld, label: String, total: i64) {
    let id = world.order_id(&label);
    let order = world.api().engine().db().fetch_order(id).await.expect("Error fetching order").expect("No such order");
    assert_eq!(order.total_price.value(), total);
}

#[then(expr = "{string} has {int} unsold items")]
async fn unsold_items(world: &mut ShopWorld, name: String, count: i64) {
    let id = world.product(&name).id;
    let available = world.api().engine().db().count_available(id).await.expect("Error counting stock");
    assert_eq!(available, count);
}

#[then(expr = "the order is rejected with {string}")]
async fn rejected_with(world: &mut ShopWorld, message: String) {
    let err = world.last_error.as_ref().expect("The order was not rejected");
    assert_eq!(err.user_message(), message);
}
