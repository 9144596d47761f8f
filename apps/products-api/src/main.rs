//! Products API - REST server over the product catalog

use axum_helpers::{create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::connect_from_config(config.database.clone()).await?;
    database::run_migrations::<migration::Migrator>(&db, "products-api").await?;

    let api_routes = api::routes(db.clone());
    let router = create_router::<domain_products::handlers::ApiDoc>(api_routes).await?;
    let app = router.merge(api::health::root_router());

    info!(
        "Starting Products API on port {}",
        config.server.port
    );

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        if let Err(e) = db.close().await {
            tracing::warn!("Error closing database connection: {:?}", e);
        }
    })
    .await?;

    info!("Products API shutdown complete");
    Ok(())
}
