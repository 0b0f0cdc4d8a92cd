use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{LocatorError, LocatorResult};
use crate::geo::GeoPoint;
use crate::index::GeoIndex;
use crate::models::chai_spot::{ChaiSpot, ChaiSpotPatch, NewChaiSpot};
use crate::repositories::VendorStore;

/// Process-local store. Records and grid index share one lock.
pub struct MemoryVendorStore {
    inner: RwLock<Inner>,
}

struct Inner {
    spots: HashMap<Uuid, ChaiSpot>,
    index: GeoIndex,
    closed: bool,
}

impl Inner {
    fn ensure_open(&self) -> LocatorResult<()> {
        if self.closed {
            return Err(LocatorError::Storage("store is closed".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryVendorStore {
    fn default() -> Self {
        Self::new(GeoIndex::default())
    }
}

impl MemoryVendorStore {
    pub fn new(index: GeoIndex) -> Self {
        Self {
            inner: RwLock::new(Inner {
                spots: HashMap::new(),
                index,
                closed: false,
            }),
        }
    }

    pub fn with_cell_degrees(cell_degrees: f64) -> Self {
        Self::new(GeoIndex::new(cell_degrees))
    }
}

#[async_trait]
impl VendorStore for MemoryVendorStore {
    async fn create(&self, spot: NewChaiSpot) -> LocatorResult<ChaiSpot> {
        spot.validate()?;
        let spot = spot.into_spot(Uuid::new_v4());

        let mut inner = self.inner.write();
        inner.ensure_open()?;
        inner.index.insert(spot.id, spot.location);
        inner.spots.insert(spot.id, spot.clone());
        Ok(spot)
    }

    async fn get_all(&self) -> LocatorResult<Vec<ChaiSpot>> {
        let inner = self.inner.read();
        inner.ensure_open()?;
        Ok(inner.spots.values().cloned().collect())
    }

    async fn update(&self, id: Uuid, patch: ChaiSpotPatch) -> LocatorResult<ChaiSpot> {
        patch.validate()?;

        let mut inner = self.inner.write();
        inner.ensure_open()?;
        let mut spot = inner
            .spots
            .get(&id)
            .cloned()
            .ok_or_else(|| LocatorError::NotFound(id.to_string()))?;
        patch.apply_to(&mut spot);

        if inner.index.position(&id) != Some(spot.location) {
            debug!("Moving chai spot {} in the index", id);
            inner.index.insert(id, spot.location);
        }
        inner.spots.insert(id, spot.clone());
        Ok(spot)
    }

    async fn delete(&self, id: Uuid) -> LocatorResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_open()?;
        if inner.spots.remove(&id).is_none() {
            return Err(LocatorError::NotFound(id.to_string()));
        }
        inner.index.remove(&id);
        Ok(())
    }

    async fn nearby(&self, center: GeoPoint, radius_meters: f64) -> LocatorResult<Vec<ChaiSpot>> {
        let inner = self.inner.read();
        inner.ensure_open()?;
        Ok(inner
            .index
            .within(&center, radius_meters)
            .into_iter()
            .filter_map(|(id, _)| inner.spots.get(&id).cloned())
            .collect())
    }

    async fn close(&self) {
        self.inner.write().closed = true;
    }
}
