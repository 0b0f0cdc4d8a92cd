use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::models::chai_spot::ChaiSpot;
use crate::models::location::Geometry;
use crate::models::place::Place;

/// One entry of a nearby listing, from the registry or the places provider.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NearbySpot {
    pub place_id: Option<String>,
    pub name: String,
    pub geometry: Geometry,
    pub rating: Option<f64>,
    pub parking: Option<bool>,
    pub photo_reference: Option<String>,
    pub vicinity: Option<String>,
}

impl From<ChaiSpot> for NearbySpot {
    fn from(spot: ChaiSpot) -> Self {
        Self {
            place_id: Some(spot.id.to_string()),
            name: spot.name,
            geometry: Geometry {
                location: spot.location.into(),
            },
            rating: spot.rating.map(f64::from),
            parking: Some(spot.parking),
            photo_reference: None,
            vicinity: None,
        }
    }
}

impl From<Place> for NearbySpot {
    fn from(place: Place) -> Self {
        Self {
            place_id: place.place_id,
            name: place.name,
            geometry: place.geometry,
            rating: place.rating,
            parking: None,
            photo_reference: place
                .photos
                .into_iter()
                .next()
                .map(|photo| photo.photo_reference),
            vicinity: place.vicinity,
        }
    }
}
