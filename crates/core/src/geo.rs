//! GeoJSON point handling and radius conversion for location queries.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Metres per kilometre; radius path segments are given in kilometres.
const METERS_PER_KM: f64 = 1000.0;

/// Mean equatorial earth radius used for great-circle distances, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_378_100.0;

/// The only GeoJSON geometry a survey location may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoKind {
    Point,
}

/// A GeoJSON `Point`: `{ "type": "Point", "coordinates": [lng, lat] }`.
///
/// Coordinate order follows GeoJSON, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: GeoKind,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: GeoKind::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.longitude(), self.latitude())
    }
}

/// Check that latitude and longitude are finite and in their valid ranges.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(CoreError::Validation(format!(
            "latitude must be between -90 and 90, got {latitude}"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::Validation(format!(
            "longitude must be between -180 and 180, got {longitude}"
        )));
    }
    Ok(())
}

/// Convert a search radius in kilometres to metres.
///
/// Negative or non-finite radii are rejected.
pub fn radius_km_to_meters(radius_km: f64) -> Result<f64, CoreError> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(CoreError::Validation(format!(
            "radius must be a non-negative number of kilometres, got {radius_km}"
        )));
    }
    Ok(radius_km * METERS_PER_KM)
}
