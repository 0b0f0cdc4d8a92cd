//! Shared helpers for the HTTP tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use chai_locator_backend::controller::router_endpoints;
use chai_locator_backend::errors::{LocatorError, LocatorResult};
use chai_locator_backend::geo::GeoPoint;
use chai_locator_backend::models::location::{Geometry, LatLng};
use chai_locator_backend::models::nearby_spot::NearbySpot;
use chai_locator_backend::places::PlacesProvider;
use chai_locator_backend::repositories::memory_repo::MemoryVendorStore;
use chai_locator_backend::service::LocatorService;

pub struct StaticPlaces;

#[async_trait]
impl PlacesProvider for StaticPlaces {
    async fn search_nearby(&self, center: GeoPoint, _: u32) -> LocatorResult<Vec<NearbySpot>> {
        Ok(vec![NearbySpot {
            place_id: Some("provider-1".to_string()),
            name: "Provider Chai".to_string(),
            geometry: Geometry {
                location: LatLng {
                    lat: center.lat(),
                    lng: center.lng(),
                },
            },
            rating: Some(4.5),
            parking: None,
            photo_reference: Some("photo-ref".to_string()),
            vicinity: Some("Around the corner".to_string()),
        }])
    }
}

pub struct DownPlaces;

#[async_trait]
impl PlacesProvider for DownPlaces {
    async fn search_nearby(&self, _: GeoPoint, _: u32) -> LocatorResult<Vec<NearbySpot>> {
        Err(LocatorError::Upstream("places provider request timed out".to_string()))
    }
}

pub fn create_test_app(places: Arc<dyn PlacesProvider>) -> Router {
    let service = LocatorService::new(Arc::new(MemoryVendorStore::default()), places);
    router_endpoints(Arc::new(service))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body())
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not json")
    };

    (status, value)
}
