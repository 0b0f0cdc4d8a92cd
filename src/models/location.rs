use serde::{Deserialize, Serialize};

use crate::errors::LocatorError;
use crate::geo::GeoPoint;

pub const POINT_TYPE: &str = "Point";

/// GeoJSON point as stored and exchanged: `coordinates` is `[lng, lat]`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

impl From<GeoPoint> for Location {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: POINT_TYPE.to_string(),
            coordinates: vec![point.lng(), point.lat()],
        }
    }
}

impl TryFrom<Location> for GeoPoint {
    type Error = LocatorError;

    fn try_from(location: Location) -> Result<Self, Self::Error> {
        if location.kind != POINT_TYPE {
            return Err(LocatorError::Validation(format!(
                "location type must be \"{}\", got \"{}\"",
                POINT_TYPE, location.kind
            )));
        }

        match location.coordinates.as_slice() {
            [lng, lat] => GeoPoint::new(*lat, *lng),
            other => Err(LocatorError::Validation(format!(
                "location needs exactly [lng, lat], got {} coordinate(s)",
                other.len()
            ))),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for LatLng {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.lat(),
            lng: point.lng(),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Geometry {
    pub location: LatLng,
}
