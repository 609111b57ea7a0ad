pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod envelope;
pub mod errors;
pub mod infrastructure;
pub mod schema;

use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use application::order_service::OrderService;
pub use application::product_service::ProductService;
pub use application::Written;
pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use domain::context::OperationContext;
pub use domain::errors::DomainError;
pub use envelope::ServiceResponse;
pub use errors::SetupError;

use infrastructure::order_repo::{DieselOrderLineItemRepository, DieselOrderRepository};
use infrastructure::product_repo::{DieselProductRepository, DieselProductUnitPriceRepository};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type PgOrderService = OrderService<DieselOrderRepository, DieselOrderLineItemRepository>;
pub type PgProductService =
    ProductService<DieselProductRepository, DieselProductUnitPriceRepository>;

/// Run any pending Diesel migrations against the pool's database and return
/// how many were applied.
pub fn run_migrations(pool: &DbPool) -> Result<usize, SetupError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| SetupError::Migration(e.to_string()))?;
    Ok(applied.len())
}

/// Postgres-backed writers sharing one pool.
pub fn build_services(pool: &DbPool) -> (PgOrderService, PgProductService) {
    let orders = OrderService::new(
        DieselOrderRepository::new(pool.clone()),
        DieselOrderLineItemRepository::new(pool.clone()),
    );
    let products = ProductService::new(
        DieselProductRepository::new(pool.clone()),
        DieselProductUnitPriceRepository::new(pool.clone()),
    );
    (orders, products)
}
