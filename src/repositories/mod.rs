use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::LocatorResult;
use crate::geo::GeoPoint;
use crate::models::chai_spot::{ChaiSpot, ChaiSpotPatch, NewChaiSpot};

pub mod memory_repo;
pub mod postgres_repo;

/// Implementations keep a spot's record and its index entry in step: no
/// reader may observe one without the other.
#[async_trait]
pub trait VendorStore: Send + Sync {
    async fn create(&self, spot: NewChaiSpot) -> LocatorResult<ChaiSpot>;

    async fn get_all(&self) -> LocatorResult<Vec<ChaiSpot>>;

    async fn update(&self, id: Uuid, patch: ChaiSpotPatch) -> LocatorResult<ChaiSpot>;

    /// Remove a spot. Missing ids are reported as `NotFound`.
    async fn delete(&self, id: Uuid) -> LocatorResult<()>;

    async fn nearby(&self, center: GeoPoint, radius_meters: f64) -> LocatorResult<Vec<ChaiSpot>>;

    /// Release backing resources. Later calls fail with a storage error.
    async fn close(&self) {}
}
