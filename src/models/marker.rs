use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Coordinates;

/// A named point on the map.
///
/// Markers are immutable after creation: there is no update operation, only
/// removal. Insertion order is preserved by the store for listing purposes
/// but carries no meaning beyond display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    /// Display name chosen by the user.
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Marker {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Input for creating a marker.
///
/// The store accepts any input as-is; name and coordinate validation happens
/// at the flow/API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMarkerInput {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
