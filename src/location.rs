//! Location acquisition: device fix first, one IP-geolocation fallback.
//!
//! States move `Idle → Resolving → Resolved | Unavailable`. There is no retry
//! loop; a fresh [`LocationAcquisition`] is built each time the creation flow
//! mounts.

use crate::geo::{DeviceLocator, DeviceOutcome, IpLocator};
use crate::models::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    Idle,
    Resolving,
    Resolved(Coordinates),
    Unavailable(LocationFailure),
}

/// Why acquisition ended without coordinates. Drives which message the view
/// shows while the map stays blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFailure {
    /// The device exists but the user refused it: ask them to enable GPS.
    PermissionRefused,
    /// Neither the device nor the fallback produced a position.
    NoPosition,
}

impl LocationFailure {
    /// User-facing status message for this failure.
    pub fn message(&self) -> &'static str {
        match self {
            LocationFailure::PermissionRefused => "Please enable your GPS",
            LocationFailure::NoPosition => "Loading location...",
        }
    }
}

#[derive(Debug)]
pub struct LocationAcquisition {
    state: LocationState,
}

impl Default for LocationAcquisition {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationAcquisition {
    pub fn new() -> Self {
        Self {
            state: LocationState::Idle,
        }
    }

    pub fn state(&self) -> LocationState {
        self.state
    }

    /// Request the device position, falling back to IP geolocation when the
    /// device is unavailable, refused, or errors. A single fallback attempt
    /// is made; its failure is terminal for this acquisition.
    pub async fn resolve<D: DeviceLocator, I: IpLocator>(
        &mut self,
        device: &D,
        ip: &I,
    ) -> LocationState {
        self.state = LocationState::Resolving;

        let outcome = device.request().await;
        if let DeviceOutcome::Fix(coordinates) = outcome {
            self.state = LocationState::Resolved(coordinates);
            return self.state;
        }

        tracing::debug!(?outcome, "No device fix, trying IP geolocation");
        self.state = match ip.locate().await {
            Ok(coordinates) => LocationState::Resolved(coordinates),
            Err(error) => {
                tracing::warn!("IP geolocation failed: {}", error);
                let failure = match outcome {
                    DeviceOutcome::Denied => LocationFailure::PermissionRefused,
                    _ => LocationFailure::NoPosition,
                };
                LocationState::Unavailable(failure)
            }
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoError;

    struct FakeDevice(DeviceOutcome);

    impl DeviceLocator for FakeDevice {
        async fn request(&self) -> DeviceOutcome {
            self.0
        }
    }

    struct FakeIp(Result<Coordinates, ()>);

    impl IpLocator for FakeIp {
        async fn locate(&self) -> Result<Coordinates, GeoError> {
            self.0
                .map_err(|_| GeoError::Service("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn device_fix_wins_without_fallback() {
        let mut acquisition = LocationAcquisition::new();
        let state = acquisition
            .resolve(
                &FakeDevice(DeviceOutcome::Fix(Coordinates::new(10.0, 20.0))),
                &FakeIp(Err(())),
            )
            .await;
        assert_eq!(state, LocationState::Resolved(Coordinates::new(10.0, 20.0)));
    }

    #[tokio::test]
    async fn denied_device_falls_back_to_ip() {
        let mut acquisition = LocationAcquisition::new();
        let state = acquisition
            .resolve(
                &FakeDevice(DeviceOutcome::Denied),
                &FakeIp(Ok(Coordinates::new(-23.5, -46.6))),
            )
            .await;
        assert_eq!(
            state,
            LocationState::Resolved(Coordinates::new(-23.5, -46.6))
        );
    }

    #[tokio::test]
    async fn denied_device_and_failed_fallback_ask_for_gps() {
        let mut acquisition = LocationAcquisition::new();
        let state = acquisition
            .resolve(&FakeDevice(DeviceOutcome::Denied), &FakeIp(Err(())))
            .await;
        assert_eq!(
            state,
            LocationState::Unavailable(LocationFailure::PermissionRefused)
        );
        assert_eq!(
            LocationFailure::PermissionRefused.message(),
            "Please enable your GPS"
        );
    }

    #[tokio::test]
    async fn unavailable_device_and_failed_fallback_are_generic() {
        let mut acquisition = LocationAcquisition::new();
        let state = acquisition
            .resolve(&FakeDevice(DeviceOutcome::Unavailable), &FakeIp(Err(())))
            .await;
        assert_eq!(state, LocationState::Unavailable(LocationFailure::NoPosition));
    }
}
