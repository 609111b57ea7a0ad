use commerce_store::{build_services, create_pool, run_migrations, AppConfig, SetupError};
use dotenvy::dotenv;

/// Brings the schema up to date and reports what the store holds.
fn main() -> Result<(), SetupError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url, config.pool_max_size)?;

    let applied = run_migrations(&pool)?;
    log::info!("Applied {} pending migrations", applied);

    let (orders, products) = build_services(&pool);
    match (orders.list_orders(), products.list_products()) {
        (Ok(orders), Ok(products)) => log::info!(
            "Store ready: {} orders, {} products",
            orders.len(),
            products.len()
        ),
        (Err(e), _) | (_, Err(e)) => log::warn!("Store migrated but not readable: {}", e),
    }

    Ok(())
}
