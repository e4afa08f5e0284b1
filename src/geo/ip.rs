//! IP-based geolocation, the fallback when no device fix is available.

use serde::Deserialize;

use crate::geo::GeoError;
use crate::models::Coordinates;

/// Default endpoint for the IP-geolocation collaborator.
const DEFAULT_ENDPOINT: &str = "https://api.ipgeolocation.io/ipgeo";

/// Approximate positioning from the caller's public IP address.
pub trait IpLocator {
    fn locate(&self) -> impl std::future::Future<Output = Result<Coordinates, GeoError>> + Send;
}

/// Client for the ipgeolocation.io API.
#[derive(Debug, Clone)]
pub struct IpGeolocationClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl IpGeolocationClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (for tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl IpLocator for IpGeolocationClient {
    async fn locate(&self) -> Result<Coordinates, GeoError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("apiKey", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Service(format!("{}: {}", status, body)));
        }

        let body: IpGeolocationResponse = response.json().await?;
        body.into_coordinates()
    }
}

/// Stand-in for hosts with no IP-geolocation key configured, so location
/// acquisition still terminates in a clean Unavailable state.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredIpLocator;

impl IpLocator for UnconfiguredIpLocator {
    async fn locate(&self) -> Result<Coordinates, GeoError> {
        Err(GeoError::Unavailable(
            "IP geolocation not configured".to_string(),
        ))
    }
}

/// The service reports coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct IpGeolocationResponse {
    latitude: String,
    longitude: String,
}

impl IpGeolocationResponse {
    fn into_coordinates(self) -> Result<Coordinates, GeoError> {
        let latitude: f64 = self
            .latitude
            .parse()
            .map_err(|_| GeoError::Malformed(format!("latitude {:?}", self.latitude)))?;
        let longitude: f64 = self
            .longitude
            .parse()
            .map_err(|_| GeoError::Malformed(format!("longitude {:?}", self.longitude)))?;
        Ok(Coordinates::new(latitude, longitude))
    }
}
