use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::service::LocatorService;

pub mod chai_spot_controller;
pub mod health_check;
pub mod nearby_controller;

pub async fn serve(locator_service: Arc<LocatorService>, config: &Config) -> anyhow::Result<()> {
    let application = router_endpoints(locator_service).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config.origin_urls)?),
    );

    let address: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    info!("API server listening on: {}", address);
    axum::Server::try_bind(&address)
        .with_context(|| format!("Unable to bind {}", address))?
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(locator_service: Arc<LocatorService>) -> Router {
    Router::new()
        .merge(health_check::router(locator_service.clone()))
        .merge(chai_spot_controller::router(locator_service.clone()))
        .merge(nearby_controller::router(locator_service))
        .fallback(page_not_found_handler)
}

/// `*` allows any origin, otherwise a comma-separated allow list.
pub fn cors_layer(origin_urls: &str) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if origin_urls.trim() == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origins = origin_urls
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<HeaderValue>>>()?;

    Ok(cors.allow_origin(origins))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => error!("Unable to listen for shutdown signal: {}", e),
    }
}
