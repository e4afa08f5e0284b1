//! Domain models for Pinpoint.
//!
//! # Core Concepts
//!
//! - [`Marker`]: a named point on the map. Immutable once created; the only
//!   lifecycle transitions are creation (by the creation flow) and removal.
//! - [`Coordinates`]: a latitude/longitude pair in degrees, used everywhere a
//!   position crosses a component boundary.
//! - [`PlaceCandidate`]: one result from the geocoding collaborator, either a
//!   forward-search match or a reverse-lookup description of a point.

mod geo;
mod marker;

pub use geo::*;
pub use marker::*;
