use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Latitude is expected in −90..90 and longitude in −180..180; the bounds are
/// the caller's responsibility, the type does not reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One geocoding result: a human-readable address and its position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Formatted address as returned by the geocoding collaborator.
    pub label: String,
    pub coordinates: Coordinates,
}
