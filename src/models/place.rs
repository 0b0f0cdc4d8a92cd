use serde::{Deserialize, Serialize};

use crate::models::location::Geometry;

pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlacesSearchResponse {
    #[serde(default)]
    pub results: Vec<Place>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Place {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Photo {
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub html_attributions: Vec<String>,
    pub photo_reference: String,
    #[serde(default)]
    pub width: i64,
}
