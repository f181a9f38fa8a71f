use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{
    db::traits::ProductCatalog,
    db_types::{Amount, NewProduct, Product},
    SqliteDatabase,
};

/// Creates a fresh database at `url` (dropping any previous one) and applies the migrations.
pub async fn prepare_test_env(url: &str) {
    create_database(url).await;
    run_migrations(url).await;
}

/// A unique SQLite URL in the system temp directory.
pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/shop_test_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 1).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    debug!("🚀️ Migrations complete for {url}");
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        trace!("🚀️ Nothing to drop at {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    debug!("🚀️ Created Sqlite database {url}");
}

/// A migrated, empty database at a random location.
pub async fn new_test_database() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database")
}

/// Closes the pool and deletes the database file.
pub async fn drop_test_database(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Failed to drop database {url}: {e}");
    }
}

/// Adds a product with `stock` unsold items. Payloads are `"<name>-item-<n>"`, numbered from 1.
pub async fn seed_product(db: &SqliteDatabase, name: &str, price: i64, stock: usize) -> Product {
    let product = db.insert_product(NewProduct::new(name, Amount::from(price))).await.expect("Error adding product");
    let payloads = (1..=stock).map(|i| format!("{name}-item-{i}")).collect::<Vec<_>>();
    db.insert_stock_items(product.id, &payloads).await.expect("Error adding stock");
    db.fetch_product(product.id).await.expect("Error fetching product").expect("Product was just added")
}
