use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::LocatorError;
use crate::service::LocatorService;

pub fn router(locator_service: Arc<LocatorService>) -> Router {
    Router::new()
        .route("/nearby-chai-spots", get(nearby_spots))
        .route_layer(Extension(locator_service))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct NearbySpotsParam {
    pub lat: f64,
    pub lng: f64,
}

pub async fn nearby_spots(
    Extension(locator_service): Extension<Arc<LocatorService>>,
    query: Result<Query<NearbySpotsParam>, QueryRejection>,
) -> impl IntoResponse {
    let nearby_spots_res = match query {
        Ok(Query(query)) => {
            debug!("Searching chai spots near {},{}", query.lat, query.lng);
            locator_service.nearby_spots(query.lat, query.lng).await
        }
        Err(rejection) => Err(LocatorError::from(rejection)),
    };

    match nearby_spots_res {
        Ok(spots) => (StatusCode::OK, Json(spots)).into_response(),
        Err(e) => {
            warn!("Something went wrong retrieving nearby chai spots due to: {}", e);
            e.into_response()
        }
    }
}
