//! External geo collaborators: forward/reverse geocoding, IP-geolocation and
//! device positioning. Each sits behind a trait so the location and creation
//! flows can be exercised without the network.

mod device;
mod geocoder;
mod ip;

pub use device::*;
pub use geocoder::*;
pub use ip::*;

use thiserror::Error;

/// Failures reported by the geo collaborators.
///
/// Note what is *not* here: a lookup miss is an absent value and an empty
/// search result is an empty vec, neither is an error.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The capability does not exist on this host (e.g. no positioning
    /// device, no API key configured).
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    /// The capability exists but refused the request.
    #[error("Request denied: {0}")]
    Denied(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with an error status of its own.
    #[error("Service error: {0}")]
    Service(String),

    /// The remote service answered with a payload we could not interpret.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Geo collaborator configuration loaded from environment variables.
#[derive(Clone, Debug, Default)]
pub struct GeoConfig {
    /// Geocoding API key (from PINPOINT_GEOCODE_API_KEY)
    pub geocode_api_key: Option<String>,
    /// Preferred response language (from PINPOINT_GEOCODE_LANGUAGE)
    pub language: Option<String>,
    /// Region bias for forward search (from PINPOINT_GEOCODE_REGION)
    pub region: Option<String>,
    /// IP-geolocation API key (from PINPOINT_IPGEO_API_KEY)
    pub ipgeo_api_key: Option<String>,
}

impl GeoConfig {
    pub fn from_env() -> Self {
        Self {
            geocode_api_key: std::env::var("PINPOINT_GEOCODE_API_KEY").ok(),
            language: std::env::var("PINPOINT_GEOCODE_LANGUAGE")
                .ok()
                .or_else(|| Some("pt".to_string())),
            region: std::env::var("PINPOINT_GEOCODE_REGION")
                .ok()
                .or_else(|| Some("br".to_string())),
            ipgeo_api_key: std::env::var("PINPOINT_IPGEO_API_KEY").ok(),
        }
    }
}
