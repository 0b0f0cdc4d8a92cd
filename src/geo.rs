//! Great-circle helpers shared by the in-memory index and the Postgres store.

use std::f64::consts::{FRAC_PI_2, PI};

use ::geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

use crate::errors::{LocatorError, LocatorResult};
use crate::models::location::Location;

/// Mean Earth radius (IUGG) in meters, the radius geo's haversine uses.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

// Absorbs rounding at the edge of a bounding box so boundary points
// still reach the haversine filter.
const BOX_PADDING_DEGREES: f64 = 1e-9;

/// A validated WGS84 coordinate. Serialized as a GeoJSON point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Location", try_from = "Location")]
pub struct GeoPoint(Point<f64>);

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> LocatorResult<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(LocatorError::Validation(
                "coordinates must be finite numbers".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(LocatorError::Validation(format!(
                "latitude {} is outside [-90, 90]",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(LocatorError::Validation(format!(
                "longitude {} is outside [-180, 180]",
                lng
            )));
        }

        Ok(Self(Point::new(lng, lat)))
    }

    pub fn lat(&self) -> f64 {
        self.0.y()
    }

    pub fn lng(&self) -> f64 {
        self.0.x()
    }

    pub fn point(&self) -> Point<f64> {
        self.0
    }

    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        self.0.haversine_distance(&other.0)
    }
}

/// Degree box enclosing every point within a radius of a center.
///
/// Longitude is split in two ranges when the box crosses the
/// antimeridian, and spans the whole circle when it covers a pole.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub lng_ranges: Vec<(f64, f64)>,
}

impl BoundingBox {
    pub fn around(center: &GeoPoint, radius_meters: f64) -> Self {
        let angular = radius_meters.max(0.0) / EARTH_RADIUS_METERS;
        let lat = center.lat().to_radians();
        let lng = center.lng().to_radians();

        let min_lat = lat - angular;
        let max_lat = lat + angular;

        if angular >= PI || min_lat <= -FRAC_PI_2 || max_lat >= FRAC_PI_2 {
            return Self {
                min_lat: min_lat.max(-FRAC_PI_2).to_degrees(),
                max_lat: max_lat.min(FRAC_PI_2).to_degrees(),
                lng_ranges: vec![(-180.0, 180.0)],
            };
        }

        let d_lng = (angular.sin() / lat.cos()).min(1.0).asin();
        let min_lng = lng - d_lng;
        let max_lng = lng + d_lng;

        let lng_ranges = if min_lng < -PI {
            vec![
                ((min_lng + 2.0 * PI).to_degrees() - BOX_PADDING_DEGREES, 180.0),
                (-180.0, max_lng.to_degrees() + BOX_PADDING_DEGREES),
            ]
        } else if max_lng > PI {
            vec![
                (min_lng.to_degrees() - BOX_PADDING_DEGREES, 180.0),
                (-180.0, (max_lng - 2.0 * PI).to_degrees() + BOX_PADDING_DEGREES),
            ]
        } else {
            vec![(
                min_lng.to_degrees() - BOX_PADDING_DEGREES,
                max_lng.to_degrees() + BOX_PADDING_DEGREES,
            )]
        };

        Self {
            min_lat: min_lat.to_degrees() - BOX_PADDING_DEGREES,
            max_lat: max_lat.to_degrees() + BOX_PADDING_DEGREES,
            lng_ranges,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        let (lat, lng) = (point.lat(), point.lng());
        lat >= self.min_lat
            && lat <= self.max_lat
            && self
                .lng_ranges
                .iter()
                .any(|(lo, hi)| lng >= *lo && lng <= *hi)
    }
}
