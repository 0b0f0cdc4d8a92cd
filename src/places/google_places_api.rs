use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{LocatorError, LocatorResult};
use crate::geo::GeoPoint;
use crate::models::nearby_spot::NearbySpot;
use crate::models::place::{PlacesSearchResponse, STATUS_OK, STATUS_ZERO_RESULTS};
use crate::places::PlacesProvider;

pub const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
pub const PLACE_TYPE: &str = "cafe";
pub const PLACE_KEYWORD: &str = "chai";

#[derive(Clone, Serialize, Debug)]
struct GooglePlacesApiParams<'a> {
    location: String,
    radius: u32,
    r#type: &'a str,
    keyword: &'a str,
    key: &'a str,
}

/// Nearby Search client. Every call is bounded by the configured timeout.
#[derive(Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> LocatorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LocatorError::Upstream(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn search_nearby(
        &self,
        center: GeoPoint,
        radius_meters: u32,
    ) -> LocatorResult<Vec<NearbySpot>> {
        let params = GooglePlacesApiParams {
            location: format!("{},{}", center.lat(), center.lng()),
            radius: radius_meters,
            r#type: PLACE_TYPE,
            keyword: PLACE_KEYWORD,
            key: &self.api_key,
        };

        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(describe_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocatorError::Upstream(format!(
                "places provider answered with http {}",
                status
            )));
        }

        let body: PlacesSearchResponse = response
            .json()
            .await
            .map_err(describe_transport_error)?;

        match body.status.as_deref() {
            None | Some(STATUS_OK) | Some(STATUS_ZERO_RESULTS) => {}
            Some(other) => {
                warn!("Places provider rejected nearby search with status: {}", other);
                return Err(LocatorError::Upstream(match body.error_message {
                    Some(message) => format!("{}: {}", other, message),
                    None => other.to_string(),
                }));
            }
        }

        debug!(
            "Places provider returned {} results around {},{}",
            body.results.len(),
            center.lat(),
            center.lng()
        );
        Ok(body.results.into_iter().map(NearbySpot::from).collect())
    }
}

// Built from the error kind only: the request url carries the api key.
fn describe_transport_error(e: reqwest::Error) -> LocatorError {
    let reason = if e.is_timeout() {
        "request timed out"
    } else if e.is_connect() {
        "could not connect"
    } else if e.is_decode() {
        "response was not valid places json"
    } else {
        "request failed"
    };
    LocatorError::Upstream(format!("places provider {}", reason))
}
