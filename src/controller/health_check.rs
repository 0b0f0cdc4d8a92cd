use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Router};
use tracing::warn;

use crate::geo::GeoPoint;
use crate::service::LocatorService;

pub fn router(locator_service: Arc<LocatorService>) -> Router {
    Router::new()
        .route("/health", get(get_health_check))
        .route_layer(Extension(locator_service))
}

/// Ready when the store answers a zero-radius spatial query.
async fn get_health_check(
    Extension(locator_service): Extension<Arc<LocatorService>>,
) -> StatusCode {
    let origin_query = match GeoPoint::new(0.0, 0.0) {
        Ok(origin) => locator_service.store().nearby(origin, 0.0).await,
        Err(e) => Err(e),
    };

    match origin_query {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!("Health check failed due to: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
