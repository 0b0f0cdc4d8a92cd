//! Grid index over spot locations.
//!
//! Points are bucketed into fixed-size degree cells. A radius query expands
//! to the cells under the query's bounding box (split at the antimeridian),
//! then every candidate is checked with the haversine distance. When the
//! expansion would touch more cells than are occupied, the occupied cells
//! are scanned directly instead.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::geo::{BoundingBox, GeoPoint};

pub const DEFAULT_CELL_DEGREES: f64 = 0.01;
// Smallest cell whose keys for +-180 degrees still fit in an i32.
pub const MIN_CELL_DEGREES: f64 = 1e-6;

type CellKey = (i32, i32);

#[derive(Debug)]
pub struct GeoIndex {
    cell_degrees: f64,
    cells: HashMap<CellKey, HashMap<Uuid, GeoPoint>>,
    positions: HashMap<Uuid, GeoPoint>,
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_DEGREES)
    }
}

impl GeoIndex {
    /// Cell sizes below `MIN_CELL_DEGREES` fall back to the default.
    pub fn new(cell_degrees: f64) -> Self {
        let cell_degrees = if cell_degrees.is_finite() && cell_degrees >= MIN_CELL_DEGREES {
            cell_degrees
        } else {
            DEFAULT_CELL_DEGREES
        };

        Self {
            cell_degrees,
            cells: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, id: &Uuid) -> Option<GeoPoint> {
        self.positions.get(id).copied()
    }

    pub fn insert(&mut self, id: Uuid, point: GeoPoint) -> Option<GeoPoint> {
        let previous = self.remove(&id);
        let cell = self.cell_of(&point);
        self.cells.entry(cell).or_default().insert(id, point);
        self.positions.insert(id, point);
        previous
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<GeoPoint> {
        let point = self.positions.remove(id)?;
        let cell = self.cell_of(&point);
        if let Some(bucket) = self.cells.get_mut(&cell) {
            bucket.remove(id);
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
        Some(point)
    }

    pub fn within(&self, center: &GeoPoint, radius_meters: f64) -> Vec<(Uuid, f64)> {
        if self.is_empty() || !(radius_meters >= 0.0) {
            return Vec::new();
        }

        let bbox = BoundingBox::around(center, radius_meters);
        let mut hits: Vec<(Uuid, f64)> = Vec::new();
        let mut consider = |id: &Uuid, point: &GeoPoint| {
            let distance = center.distance_to(point);
            if distance <= radius_meters {
                hits.push((*id, distance));
            }
        };

        match self.candidate_cells(&bbox) {
            Some(cells) => {
                for cell in cells {
                    if let Some(bucket) = self.cells.get(&cell) {
                        for (id, point) in bucket {
                            consider(id, point);
                        }
                    }
                }
            }
            None => {
                debug!(
                    "Radius {}m spans more cells than are occupied, scanning {} cells",
                    radius_meters,
                    self.cells.len()
                );
                for bucket in self.cells.values() {
                    for (id, point) in bucket {
                        if bbox.contains(point) {
                            consider(id, point);
                        }
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }

    /// Cell keys under the box, or `None` when a scan of the occupied cells is cheaper.
    fn candidate_cells(&self, bbox: &BoundingBox) -> Option<Vec<CellKey>> {
        let lat_lo = self.cell_coord(bbox.min_lat);
        let lat_hi = self.cell_coord(bbox.max_lat);
        let lng_spans: Vec<(i32, i32)> = bbox
            .lng_ranges
            .iter()
            .map(|(lo, hi)| (self.cell_coord(*lo), self.cell_coord(*hi)))
            .collect();

        let lat_count = (lat_hi as i64 - lat_lo as i64 + 1) as f64;
        let lng_count: f64 = lng_spans
            .iter()
            .map(|(lo, hi)| (*hi as i64 - *lo as i64 + 1) as f64)
            .sum();

        if lat_count * lng_count > self.cells.len() as f64 {
            return None;
        }

        let mut keys = Vec::with_capacity((lat_count * lng_count) as usize);
        for lat in lat_lo..=lat_hi {
            for (lng_lo, lng_hi) in &lng_spans {
                for lng in *lng_lo..=*lng_hi {
                    keys.push((lat, lng));
                }
            }
        }
        Some(keys)
    }

    fn cell_of(&self, point: &GeoPoint) -> CellKey {
        (self.cell_coord(point.lat()), self.cell_coord(point.lng()))
    }

    fn cell_coord(&self, degrees: f64) -> i32 {
        (degrees / self.cell_degrees).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::EARTH_RADIUS_METERS;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    fn meters_north(origin: &GeoPoint, meters: f64) -> GeoPoint {
        point(
            origin.lat() + (meters / EARTH_RADIUS_METERS).to_degrees(),
            origin.lng(),
        )
    }

    #[test]
    fn returns_only_points_inside_the_radius() {
        let mut index = GeoIndex::default();
        let first = point(28.6139, 77.209);
        let second = meters_north(&first, 100.0);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        index.insert(a, first);
        index.insert(b, second);

        let hits = index.within(&first, 50.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, a);

        let hits = index.within(&first, 150.0);
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn moving_an_entry_leaves_no_stale_bucket() {
        let mut index = GeoIndex::new(0.01);
        let id = Uuid::new_v4();
        let old = point(12.97, 77.59);
        let new = point(13.5, 78.2);

        assert_eq!(index.insert(id, old), None);
        assert_eq!(index.insert(id, new), Some(old));

        assert_eq!(index.len(), 1);
        assert!(index.within(&old, 500.0).is_empty());
        assert_eq!(index.within(&new, 1.0)[0].0, id);
        assert_eq!(index.cells.len(), 1);
    }

    #[test]
    fn removal_drops_the_entry() {
        let mut index = GeoIndex::default();
        let id = Uuid::new_v4();
        let at = point(-33.8688, 151.2093);
        index.insert(id, at);

        assert_eq!(index.remove(&id), Some(at));
        assert_eq!(index.remove(&id), None);
        assert!(index.is_empty());
        assert!(index.cells.is_empty());
        assert!(index.within(&at, 10.0).is_empty());
    }

    #[test]
    fn finds_neighbours_across_the_antimeridian() {
        let mut index = GeoIndex::default();
        let id = Uuid::new_v4();
        index.insert(id, point(-16.5, -179.999));
        index.insert(Uuid::new_v4(), point(-16.5, 170.0));

        let hits = index.within(&point(-16.5, 179.999), 1_000.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, id);
    }

    #[test]
    fn finds_neighbours_around_a_pole() {
        let mut index = GeoIndex::default();
        let near = Uuid::new_v4();
        index.insert(near, point(89.999, 100.0));
        index.insert(Uuid::new_v4(), point(80.0, 100.0));

        let hits = index.within(&point(89.999, -80.0), 1_000.0);
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![near]);
    }

    #[test]
    fn tiny_cells_fall_back_to_the_default() {
        assert_eq!(GeoIndex::new(1e-9).cell_degrees, DEFAULT_CELL_DEGREES);
        assert_eq!(GeoIndex::new(MIN_CELL_DEGREES).cell_degrees, MIN_CELL_DEGREES);

        let index = GeoIndex::new(MIN_CELL_DEGREES);
        assert!(index.cell_coord(180.0) < i32::MAX);
        assert!(index.cell_coord(-180.0) > i32::MIN);
    }

    #[test]
    fn negative_radius_matches_nothing() {
        let mut index = GeoIndex::default();
        let at = point(0.0, 0.0);
        index.insert(Uuid::new_v4(), at);

        assert!(index.within(&at, -1.0).is_empty());
        assert!(index.within(&at, f64::NAN).is_empty());
    }

    #[test]
    fn agrees_with_a_full_scan() {
        let mut index = GeoIndex::new(0.005);
        let mut all = Vec::new();
        // Deterministic spread of points around Pune.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 10_000) as f64 / 10_000.0
        };
        for _ in 0..500 {
            let at = point(18.45 + next() * 0.2, 73.75 + next() * 0.2);
            let id = Uuid::new_v4();
            index.insert(id, at);
            all.push((id, at));
        }

        for radius in [50.0, 400.0, 2_000.0, 15_000.0] {
            let center = point(18.55, 73.85);
            let mut expected: Vec<Uuid> = all
                .iter()
                .filter(|(_, at)| center.distance_to(at) <= radius)
                .map(|(id, _)| *id)
                .collect();
            let mut actual: Vec<Uuid> = index
                .within(&center, radius)
                .into_iter()
                .map(|(id, _)| id)
                .collect();
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected, "radius {}", radius);
        }
    }
}
