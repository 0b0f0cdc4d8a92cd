use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LocatorError, LocatorResult};
use crate::geo::GeoPoint;

pub const MAX_RATING: u8 = 5;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChaiSpot {
    pub id: Uuid,
    pub name: String,
    pub location: GeoPoint,
    pub rating: Option<u8>,
    pub parking: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NewChaiSpot {
    pub name: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub parking: bool,
}

impl NewChaiSpot {
    pub fn validate(&self) -> LocatorResult<()> {
        validate_name(&self.name)?;
        validate_rating(self.rating)
    }

    pub fn into_spot(self, id: Uuid) -> ChaiSpot {
        ChaiSpot {
            id,
            name: self.name,
            location: self.location,
            rating: self.rating,
            parking: self.parking,
        }
    }
}

/// Fields a client may change on an existing spot.
///
/// `rating: null` clears the rating, an absent key leaves it alone.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChaiSpotPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub rating: Option<Option<u8>>,
    #[serde(default)]
    pub parking: Option<bool>,
}

impl ChaiSpotPatch {
    pub fn validate(&self) -> LocatorResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        Ok(())
    }

    pub fn apply_to(self, spot: &mut ChaiSpot) {
        if let Some(name) = self.name {
            spot.name = name;
        }
        if let Some(location) = self.location {
            spot.location = location;
        }
        if let Some(rating) = self.rating {
            spot.rating = rating;
        }
        if let Some(parking) = self.parking {
            spot.parking = parking;
        }
    }
}

fn validate_name(name: &str) -> LocatorResult<()> {
    if name.trim().is_empty() {
        return Err(LocatorError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_rating(rating: Option<u8>) -> LocatorResult<()> {
    match rating {
        Some(rating) if rating > MAX_RATING => Err(LocatorError::Validation(format!(
            "rating must be between 0 and {}, got {}",
            MAX_RATING, rating
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn spot() -> ChaiSpot {
        ChaiSpot {
            id: Uuid::new_v4(),
            name: "Tapri".to_string(),
            location: GeoPoint::new(26.9124, 75.7873).unwrap(),
            rating: Some(4),
            parking: true,
        }
    }

    #[test]
    fn absent_rating_serializes_as_null() {
        let mut spot = spot();
        spot.rating = None;

        let value = serde_json::to_value(&spot).unwrap();
        assert_eq!(value["rating"], serde_json::Value::Null);
        assert_eq!(value["location"]["type"], "Point");
    }

    #[test]
    fn new_spot_defaults_optional_fields() {
        let payload: NewChaiSpot = serde_json::from_value(json!({
            "name": "Chai Point",
            "location": {"type": "Point", "coordinates": [77.59, 12.97]}
        }))
        .unwrap();

        assert_eq!(payload.rating, None);
        assert!(!payload.parking);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn rating_above_bound_is_rejected() {
        let payload: NewChaiSpot = serde_json::from_value(json!({
            "name": "Chai Point",
            "location": {"type": "Point", "coordinates": [77.59, 12.97]},
            "rating": 9
        }))
        .unwrap();

        assert!(matches!(payload.validate(), Err(LocatorError::Validation(_))));
    }

    #[test]
    fn negative_rating_does_not_deserialize() {
        let payload = serde_json::from_value::<NewChaiSpot>(json!({
            "name": "Chai Point",
            "location": {"type": "Point", "coordinates": [77.59, 12.97]},
            "rating": -1
        }));

        assert!(payload.is_err());
    }

    #[test]
    fn padded_name_is_stored_as_sent() {
        let payload = NewChaiSpot {
            name: " Tapri ".to_string(),
            location: GeoPoint::new(26.9124, 75.7873).unwrap(),
            rating: None,
            parking: false,
        };
        assert!(payload.validate().is_ok());
        assert_eq!(payload.into_spot(Uuid::new_v4()).name, " Tapri ");

        let mut stored = spot();
        ChaiSpotPatch {
            name: Some("  Tapri 2 ".to_string()),
            ..Default::default()
        }
        .apply_to(&mut stored);
        assert_eq!(stored.name, "  Tapri 2 ");
    }

    #[test]
    fn blank_name_is_rejected() {
        let patch = ChaiSpotPatch {
            name: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(patch.validate().is_err());
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let patch = serde_json::from_value::<ChaiSpotPatch>(json!({"id": "abc"}));
        assert!(patch.is_err());

        let patch = serde_json::from_value::<ChaiSpotPatch>(json!({"owner": "me"}));
        assert!(patch.is_err());
    }

    #[test]
    fn patch_distinguishes_null_rating_from_absent() {
        let cleared: ChaiSpotPatch = serde_json::from_value(json!({"rating": null})).unwrap();
        assert_eq!(cleared.rating, Some(None));

        let untouched: ChaiSpotPatch = serde_json::from_value(json!({"parking": false})).unwrap();
        assert_eq!(untouched.rating, None);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let original = spot();
        let mut updated = original.clone();

        ChaiSpotPatch {
            rating: Some(Some(2)),
            ..Default::default()
        }
        .apply_to(&mut updated);

        assert_eq!(updated.rating, Some(2));
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.location, original.location);
        assert_eq!(updated.parking, original.parking);
        assert_eq!(updated.id, original.id);
    }
}
