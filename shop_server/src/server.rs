use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use shop_engine::{OrderFlowApi, ReconciliationEngine, ReportsApi, SqliteDatabase};

use crate::{
    auth::AdminAuth,
    config::ServerConfig,
    errors::ServerError,
    integrations::sepay::SepayLedger,
    notifications::{create_notification_handlers, Notifier},
    routes::configure_routes,
    sweep_worker::start_sweep_worker,
};

/// The engine as it runs in production: SQLite storage, payments read from SePay.
pub type ShopEngine = ReconciliationEngine<SqliteDatabase, SepayLedger>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let ledger = SepayLedger::new(config.sepay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;

    let notifier = Notifier::new(config.notify_webhook_url.clone(), config.admin_ids.clone())?;
    let handlers = create_notification_handlers(notifier);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let engine = ReconciliationEngine::new(db, ledger, config.engine.clone(), producers);
    let restored = engine.restore().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("💻️ {restored} orders are waiting for payment");
    let _worker = start_sweep_worker(engine.clone(), config.engine.sweep_interval);

    let srv = create_server_instance(config, engine)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, engine: ShopEngine) -> Result<Server, ServerError> {
    let admin_auth = AdminAuth::new(config.admin_api_key.clone());
    if !admin_auth.is_enabled() {
        warn!("💻️ No admin API key is configured. The /admin routes will refuse every request.");
    }
    let payment_display = config.payment_display.clone();
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(engine.clone(), payment_display.clone());
        let reports_api = ReportsApi::new(engine.db().clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("shop::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(reports_api))
            .app_data(web::Data::new(admin_auth.clone()))
            .configure(configure_routes::<SqliteDatabase, SepayLedger>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
