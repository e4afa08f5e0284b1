//! Device positioning.
//!
//! Servers and terminals have no GPS, so the production implementation reads
//! an optional fixed coordinate from the environment. The trait exists so the
//! location flow can be tested against every outcome.

use crate::models::Coordinates;

/// Outcome of a device positioning request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceOutcome {
    /// The device produced a position.
    Fix(Coordinates),
    /// No positioning capability on this host.
    Unavailable,
    /// Capability exists but the user refused the request.
    Denied,
    /// Capability exists but the request failed.
    Error,
}

/// A positioning device, requested once per creation-flow mount.
pub trait DeviceLocator {
    fn request(&self) -> impl std::future::Future<Output = DeviceOutcome> + Send;
}

/// Host positioning: a fixed coordinate from the environment, or nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostLocator {
    fix: Option<Coordinates>,
}

impl HostLocator {
    pub fn new(fix: Option<Coordinates>) -> Self {
        Self { fix }
    }

    /// Read PINPOINT_DEVICE_LAT / PINPOINT_DEVICE_LNG; both must be present
    /// and numeric for the host to report a fix.
    pub fn from_env() -> Self {
        let latitude = std::env::var("PINPOINT_DEVICE_LAT")
            .ok()
            .and_then(|value| value.parse::<f64>().ok());
        let longitude = std::env::var("PINPOINT_DEVICE_LNG")
            .ok()
            .and_then(|value| value.parse::<f64>().ok());

        let fix = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };
        Self { fix }
    }
}

impl DeviceLocator for HostLocator {
    async fn request(&self) -> DeviceOutcome {
        match self.fix {
            Some(coordinates) => DeviceOutcome::Fix(coordinates),
            None => DeviceOutcome::Unavailable,
        }
    }
}
