pub mod chai_spot;
pub mod location;
pub mod nearby_spot;
pub mod place;
