use async_trait::async_trait;

use crate::errors::LocatorResult;
use crate::geo::GeoPoint;
use crate::models::nearby_spot::NearbySpot;

pub mod google_places_api;

/// External places search, queried for chai spots around a point.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search_nearby(
        &self,
        center: GeoPoint,
        radius_meters: u32,
    ) -> LocatorResult<Vec<NearbySpot>>;
}
