//! Pinpoint: save named map markers and find your way back to them.
//!
//! The crate is organized around one piece of owned state and a handful of
//! external collaborators:
//!
//! - [`store`]: the marker collection, hydrated from SQLite at startup and
//!   re-persisted wholesale on every mutation.
//! - [`location`]: best-effort resolution of the user's position, device
//!   fix first with a single IP-geolocation fallback.
//! - [`geo`]: forward/reverse geocoding and IP-geolocation clients, behind
//!   traits so the flow can be driven without the network.
//! - [`flow`]: the marker creation state machine that ties the above
//!   together and guards against out-of-order reverse-lookup responses.
//! - [`api`]: the HTTP surface consumed by the map front end.

pub mod api;
pub mod flow;
pub mod geo;
pub mod location;
pub mod models;
pub mod store;
