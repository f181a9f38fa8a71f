//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! | method | path                   | handler             |
//! |--------|------------------------|---------------------|
//! | GET    | `/health`              | [`health`]          |
//! | GET    | `/products`            | [`products`]        |
//! | GET    | `/products/{id}`       | [`product_by_id`]   |
//! | POST   | `/orders`              | [`create_order`]    |
//! | GET    | `/orders/{id}`         | [`order_by_id`]     |
//! | POST   | `/orders/{id}/check`   | [`check_order`]     |
//! | POST   | `/orders/{id}/cancel`  | [`cancel_order`]    |
//! | GET    | `/buyers/{id}/orders`  | [`buyer_orders`]    |
//! | GET    | `/buyers/{id}/summary` | [`buyer_summary`]   |
//! | GET    | `/admin/orders`        | [`recent_orders`]   |
//! | GET    | `/admin/revenue`       | [`revenue`]         |
//!
//! Handlers never block. Everything slow (the database, the bank API) is awaited.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use serde_json::json;
use shop_engine::{
    db_types::{BuyerId, OrderId, ProductId},
    gateway::PaymentLedger,
    order_objects::NewOrderRequest,
    CancelOutcome,
    CheckOutcome,
    OrderFlowApi,
    ReportsApi,
    ShopBackend,
    DEFAULT_HISTORY_LIMIT,
};

use crate::{auth::AdminAuth, data_objects::LimitParams, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers every route. `B` and `L` are the storage backend and payment ledger the app data was built with.
pub fn configure_routes<B, L>(cfg: &mut web::ServiceConfig)
where
    B: ShopBackend + 'static,
    L: PaymentLedger + 'static,
{
    cfg.service(health)
        .service(ProductsRoute::<B>::new())
        .service(ProductByIdRoute::<B>::new())
        .service(CreateOrderRoute::<B, L>::new())
        .service(OrderByIdRoute::<B>::new())
        .service(CheckOrderRoute::<B, L>::new())
        .service(CancelOrderRoute::<B, L>::new())
        .service(BuyerOrdersRoute::<B>::new())
        .service(BuyerSummaryRoute::<B>::new())
        .service(RecentOrdersRoute::<B>::new())
        .service(RevenueRoute::<B>::new());
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Catalog  ----------------------------------------------------
route!(products => Get "/products" impl ShopBackend);
/// All products, with the number of unsold items of each.
pub async fn products<B: ShopBackend>(api: web::Data<ReportsApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET products");
    let products = api.products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_by_id => Get "/products/{id}" impl ShopBackend);
pub async fn product_by_id<B: ShopBackend>(
    path: web::Path<ProductId>,
    api: web::Data<ReportsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET product {id}");
    let product =
        api.product(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Product {id} was not found.")))?;
    Ok(HttpResponse::Ok().json(product))
}

// ----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl ShopBackend, PaymentLedger);
/// Places an order. The response carries the reference token and the bank details the buyer must pay to.
///
/// Validation failures (bad quantity, unknown product, not enough stock) are reported as `400 Bad Request` with a
/// message that can be shown to the buyer verbatim.
pub async fn create_order<B: ShopBackend, L: PaymentLedger>(
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderFlowApi<B, L>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST new order for buyer {}: {} x {}", request.buyer_id, request.quantity, request.product_id);
    let created = api.create_order(request).await?;
    Ok(HttpResponse::Ok().json(created))
}

route!(order_by_id => Get "/orders/{id}" impl ShopBackend);
pub async fn order_by_id<B: ShopBackend>(
    path: web::Path<OrderId>,
    api: web::Data<ReportsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET order {id}");
    let order =
        api.order_by_id(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Order {id} was not found.")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(check_order => Post "/orders/{id}/check" impl ShopBackend, PaymentLedger);
/// The buyer's "I have paid" button. Returns the outcome of checking the order right now.
///
/// An order that is not waiting for payment (because it never existed or was already resolved) is a `404`. Use
/// `GET /orders/{id}` to find out what happened to it.
pub async fn check_order<B: ShopBackend, L: PaymentLedger>(
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B, L>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ POST recheck for order {id}");
    match api.check_order(id).await? {
        CheckOutcome::NotFound => Err(not_pending(id)),
        outcome => Ok(HttpResponse::Ok().json(outcome)),
    }
}

route!(cancel_order => Post "/orders/{id}/cancel" impl ShopBackend, PaymentLedger);
pub async fn cancel_order<B: ShopBackend, L: PaymentLedger>(
    path: web::Path<OrderId>,
    api: web::Data<OrderFlowApi<B, L>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ POST cancel for order {id}");
    match api.cancel_order(id).await? {
        CancelOutcome::NotFound => Err(not_pending(id)),
        outcome => Ok(HttpResponse::Ok().json(json!({ "status": outcome }))),
    }
}

fn not_pending(id: OrderId) -> ServerError {
    ServerError::NoRecordFound(format!("Order {id} is not awaiting payment."))
}

// ----------------------------------------------   Buyers  ----------------------------------------------------
route!(buyer_orders => Get "/buyers/{id}/orders" impl ShopBackend);
/// The buyer's latest orders, newest first. Completed orders include the delivered goods.
pub async fn buyer_orders<B: ShopBackend>(
    path: web::Path<BuyerId>,
    query: web::Query<LimitParams>,
    api: web::Data<ReportsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let buyer_id = path.into_inner();
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    trace!("💻️ GET order history for buyer {buyer_id} (limit {limit})");
    let orders = api.orders_for_buyer(buyer_id, limit).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(buyer_summary => Get "/buyers/{id}/summary" impl ShopBackend);
pub async fn buyer_summary<B: ShopBackend>(
    path: web::Path<BuyerId>,
    api: web::Data<ReportsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let buyer_id = path.into_inner();
    trace!("💻️ GET summary for buyer {buyer_id}");
    let summary = api.buyer_summary(buyer_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

// ----------------------------------------------   Admin  ----------------------------------------------------
route!(recent_orders => Get "/admin/orders" impl ShopBackend);
pub async fn recent_orders<B: ShopBackend>(
    req: HttpRequest,
    query: web::Query<LimitParams>,
    auth: web::Data<AdminAuth>,
    api: web::Data<ReportsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    auth.check(&req)?;
    trace!("💻️ GET recent orders");
    let orders = api.recent_orders(query.limit).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(revenue => Get "/admin/revenue" impl ShopBackend);
pub async fn revenue<B: ShopBackend>(
    req: HttpRequest,
    auth: web::Data<AdminAuth>,
    api: web::Data<ReportsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    auth.check(&req)?;
    trace!("💻️ GET revenue summary");
    let summary = api.revenue_summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}
