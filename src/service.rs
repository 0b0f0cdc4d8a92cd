use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{LocatorError, LocatorResult};
use crate::geo::GeoPoint;
use crate::models::chai_spot::{ChaiSpot, ChaiSpotPatch, NewChaiSpot};
use crate::models::nearby_spot::NearbySpot;
use crate::places::PlacesProvider;
use crate::repositories::VendorStore;

pub const NEARBY_RADIUS_METERS: u32 = 2000;

/// Request-facing operations over the vendor store and the places provider.
#[derive(Clone)]
pub struct LocatorService {
    store: Arc<dyn VendorStore>,
    places: Arc<dyn PlacesProvider>,
    include_stored: bool,
}

impl LocatorService {
    pub fn new(store: Arc<dyn VendorStore>, places: Arc<dyn PlacesProvider>) -> Self {
        Self {
            store,
            places,
            include_stored: true,
        }
    }

    pub fn with_stored_results(mut self, include_stored: bool) -> Self {
        self.include_stored = include_stored;
        self
    }

    pub fn store(&self) -> &Arc<dyn VendorStore> {
        &self.store
    }

    #[instrument(skip(self, payload), fields(spot_name = %payload.name))]
    pub async fn add_spot(&self, payload: NewChaiSpot) -> LocatorResult<ChaiSpot> {
        let spot = self.store.create(payload).await?;
        info!("Added chai spot {}", spot.id);
        Ok(spot)
    }

    pub async fn list_spots(&self) -> LocatorResult<Vec<ChaiSpot>> {
        self.store.get_all().await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_spot(&self, id: &str, patch: ChaiSpotPatch) -> LocatorResult<ChaiSpot> {
        let id = parse_spot_id(id)?;
        self.store.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn remove_spot(&self, id: &str) -> LocatorResult<()> {
        let id = parse_spot_id(id)?;
        self.store.delete(id).await?;
        info!("Removed chai spot {}", id);
        Ok(())
    }

    /// Registry spots within the search radius (nearest first) followed by
    /// the provider's results. A provider failure fails the whole call.
    #[instrument(skip(self))]
    pub async fn nearby_spots(&self, lat: f64, lng: f64) -> LocatorResult<Vec<NearbySpot>> {
        let center = GeoPoint::new(lat, lng)?;

        let stored = async {
            if self.include_stored {
                self.store
                    .nearby(center, f64::from(NEARBY_RADIUS_METERS))
                    .await
            } else {
                Ok(Vec::new())
            }
        };
        let external = self.places.search_nearby(center, NEARBY_RADIUS_METERS);

        let (stored, external) = futures::join!(stored, external);
        let external = external?;
        let stored = stored?;

        let mut spots: Vec<NearbySpot> = stored.into_iter().map(NearbySpot::from).collect();
        spots.extend(external);
        Ok(spots)
    }
}

// An id that cannot have been issued names no stored spot.
fn parse_spot_id(id: &str) -> LocatorResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| LocatorError::NotFound(id.to_string()))
}
