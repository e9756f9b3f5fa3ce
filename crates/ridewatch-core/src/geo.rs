//! Great-circle distance between two latitude/longitude pairs.

use crate::constants::EARTH_RADIUS_KM;
use crate::models::Coordinates;

/// Haversine distance in kilometers between two points given in degrees.
///
/// Coordinates are not range-checked; callers pass valid degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// [`haversine_km`] over [`Coordinates`].
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    haversine_km(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Distance in meters, the unit the motion threshold is expressed in.
pub fn distance_m(from: Coordinates, to: Coordinates) -> f64 {
    distance_km(from, to) * 1000.0
}
