//! Forward and reverse geocoding.
//!
//! The [`Geocoder`] trait is the seam the creation flow is written against;
//! [`GoogleGeocoder`] is the production implementation backed by the Google
//! Geocoding API.

use serde::Deserialize;

use crate::geo::GeoError;
use crate::models::{Coordinates, PlaceCandidate};

/// Default endpoint for the geocoding collaborator.
const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Forward (text → candidates) and reverse (coordinates → candidates)
/// geocoding, both request/response with no shared state.
pub trait Geocoder {
    /// Address search. An empty vec means "no matches", not failure.
    fn search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<PlaceCandidate>, GeoError>> + Send;

    /// Reverse lookup for a point. Candidates are ordered by relevance; the
    /// first candidate's label describes the point.
    fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> impl std::future::Future<Output = Result<Vec<PlaceCandidate>, GeoError>> + Send;
}

/// Reverse-lookup convenience: the first candidate's formatted address, or
/// `None` when the service knows nothing about the point.
pub async fn describe<G: Geocoder>(
    geocoder: &G,
    coordinates: Coordinates,
) -> Result<Option<String>, GeoError> {
    let candidates = geocoder.reverse(coordinates).await?;
    Ok(candidates.into_iter().next().map(|c| c.label))
}

/// Geocoding client for the Google Geocoding API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    endpoint: String,
    api_key: String,
    language: Option<String>,
    region: Option<String>,
    client: reqwest::Client,
}

impl GoogleGeocoder {
    pub fn new(
        api_key: impl Into<String>,
        language: Option<String>,
        region: Option<String>,
    ) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            language,
            region,
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (for tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn query(&self, params: &[(&str, String)]) -> Result<Vec<PlaceCandidate>, GeoError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(params)
            .query(&[("key", &self.api_key)]);
        if let Some(ref language) = self.language {
            request = request.query(&[("language", language)]);
        }
        if let Some(ref region) = self.region {
            request = request.query(&[("region", region)]);
        }

        let body: GeocodeResponse = request.send().await?.json().await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body
                .results
                .into_iter()
                .map(|result| PlaceCandidate {
                    label: result.formatted_address,
                    coordinates: Coordinates::new(
                        result.geometry.location.lat,
                        result.geometry.location.lng,
                    ),
                })
                .collect()),
            "REQUEST_DENIED" => Err(GeoError::Denied(
                body.error_message.unwrap_or(body.status),
            )),
            _ => Err(GeoError::Service(match body.error_message {
                Some(message) => format!("{}: {}", body.status, message),
                None => body.status,
            })),
        }
    }
}

impl Geocoder for GoogleGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeoError> {
        self.query(&[("address", query.to_string())]).await
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Vec<PlaceCandidate>, GeoError> {
        let latlng = format!("{},{}", coordinates.latitude, coordinates.longitude);
        self.query(&[("latlng", latlng)]).await
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}
