use std::sync::Arc;

use anyhow::Context;
use chai_locator_backend::config::Config;
use chai_locator_backend::controller;
use chai_locator_backend::places::google_places_api::GooglePlacesClient;
use chai_locator_backend::repositories::memory_repo::MemoryVendorStore;
use chai_locator_backend::repositories::postgres_repo::PostgresVendorStore;
use chai_locator_backend::repositories::VendorStore;
use chai_locator_backend::service::LocatorService;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    info!("Starting chai locator in {} environment", config.environment);

    let store: Arc<dyn VendorStore> = match &config.database_url {
        Some(database_url) => Arc::new(
            PostgresVendorStore::connect(database_url, config.database_pool_size)
                .await
                .context("Failed to connect to postgres")?,
        ),
        None => {
            warn!("DATABASE_URL is not set, chai spots will only live in memory");
            Arc::new(MemoryVendorStore::with_cell_degrees(config.index_cell_degrees))
        }
    };

    let places = GooglePlacesClient::new(
        config.places_base_url.clone(),
        config.google_maps_api_key.clone(),
        config.places_timeout(),
    )?;

    let locator_service = Arc::new(
        LocatorService::new(store.clone(), Arc::new(places))
            .with_stored_results(config.nearby_include_stored),
    );

    let served = controller::serve(locator_service, &config).await;
    store.close().await;
    info!("Chai locator stopped");
    served
}
