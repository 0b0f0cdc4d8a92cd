use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use serde_json::json;
use tracing::warn;

use crate::errors::LocatorError;
use crate::models::chai_spot::{ChaiSpotPatch, NewChaiSpot};
use crate::service::LocatorService;

pub fn router(locator_service: Arc<LocatorService>) -> Router {
    Router::new()
        .route("/chai-spots", get(list_spots).post(add_spot))
        .route("/chai-spots/:id", put(update_spot).delete(remove_spot))
        .route_layer(Extension(locator_service))
}

pub async fn add_spot(
    Extension(locator_service): Extension<Arc<LocatorService>>,
    body: Result<Json<NewChaiSpot>, JsonRejection>,
) -> impl IntoResponse {
    let add_spot_res = match body {
        Ok(Json(payload)) => locator_service.add_spot(payload).await,
        Err(rejection) => Err(LocatorError::from(rejection)),
    };

    match add_spot_res {
        Ok(spot) => (StatusCode::CREATED, Json(spot)).into_response(),
        Err(e) => {
            warn!("Something went wrong adding chai spot due to: {}", e);
            e.into_response()
        }
    }
}

pub async fn list_spots(
    Extension(locator_service): Extension<Arc<LocatorService>>,
) -> impl IntoResponse {
    match locator_service.list_spots().await {
        Ok(spots) => (StatusCode::OK, Json(spots)).into_response(),
        Err(e) => {
            warn!("Something went wrong retrieving chai spots due to: {}", e);
            e.into_response()
        }
    }
}

pub async fn update_spot(
    Extension(locator_service): Extension<Arc<LocatorService>>,
    Path(id): Path<String>,
    body: Result<Json<ChaiSpotPatch>, JsonRejection>,
) -> impl IntoResponse {
    let update_spot_res = match body {
        Ok(Json(patch)) => locator_service.update_spot(&id, patch).await,
        Err(rejection) => Err(LocatorError::from(rejection)),
    };

    match update_spot_res {
        Ok(spot) => (StatusCode::OK, Json(spot)).into_response(),
        Err(e) => {
            warn!("Something went wrong updating chai spot {} due to: {}", id, e);
            e.into_response()
        }
    }
}

pub async fn remove_spot(
    Extension(locator_service): Extension<Arc<LocatorService>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match locator_service.remove_spot(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Chai spot deleted" })),
        )
            .into_response(),
        Err(e) => {
            warn!("Something went wrong removing chai spot {} due to: {}", id, e);
            e.into_response()
        }
    }
}
