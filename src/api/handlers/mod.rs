use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::geo::{describe, GeoError, Geocoder, UnconfiguredIpLocator};
use crate::location::{LocationAcquisition, LocationState};
use crate::models::{Coordinates, CreateMarkerInput, Marker, PlaceCandidate};

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Map a collaborator failure to a status the front end can act on:
/// missing capability is 503, anything the remote service did wrong is 502.
fn geo_error(e: GeoError) -> (StatusCode, String) {
    match e {
        GeoError::Unavailable(_) => {
            tracing::warn!("Geo capability unavailable: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        other => {
            tracing::error!("Geo request failed: {}", other);
            (StatusCode::BAD_GATEWAY, "Geo request failed".to_string())
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Markers
// ============================================================

pub async fn list_markers(State(state): State<AppState>) -> Json<Vec<Marker>> {
    Json(state.store.list())
}

pub async fn get_marker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Marker>, (StatusCode, String)> {
    state
        .store
        .get(id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Marker not found".to_string()))
}

pub async fn create_marker(
    State(state): State<AppState>,
    Json(input): Json<CreateMarkerInput>,
) -> Result<(StatusCode, Json<Marker>), (StatusCode, String)> {
    // The store is lenient; the boundary is where input is rejected.
    if input.name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Marker name must not be empty".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&input.latitude) || !(-180.0..=180.0).contains(&input.longitude) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Coordinates out of range".to_string(),
        ));
    }

    state
        .store
        .create(input)
        .map(|marker| (StatusCode::CREATED, Json(marker)))
        .map_err(internal_error)
}

/// Removal mirrors the store contract: deleting an absent marker is a
/// no-op, not an error.
pub async fn delete_marker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.store.remove(id).map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Location Acquisition
// ============================================================

pub async fn resolve_location(State(state): State<AppState>) -> impl IntoResponse {
    let mut acquisition = LocationAcquisition::new();
    let resolved = match &state.ip {
        Some(ip) => acquisition.resolve(&state.device, ip).await,
        None => {
            acquisition
                .resolve(&state.device, &UnconfiguredIpLocator)
                .await
        }
    };

    match resolved {
        LocationState::Resolved(coordinates) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "resolved",
                "latitude": coordinates.latitude,
                "longitude": coordinates.longitude,
            })),
        ),
        LocationState::Unavailable(failure) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unavailable",
                "message": failure.message(),
            })),
        ),
        // resolve() only returns terminal states
        LocationState::Idle | LocationState::Resolving => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "status": "error" })),
        ),
    }
}

// ============================================================
// Place Resolver
// ============================================================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Forward search. An empty list is a valid answer ("no results"); only a
/// failed request is an error, and the two must stay distinguishable.
pub async fn search_places(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PlaceCandidate>>, (StatusCode, String)> {
    let geocoder = state.geocoder.as_ref().ok_or_else(|| {
        geo_error(GeoError::Unavailable("Geocoding not configured".to_string()))
    })?;

    geocoder
        .search(&query.q)
        .await
        .map(Json)
        .map_err(geo_error)
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn reverse_lookup(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let geocoder = state.geocoder.as_ref().ok_or_else(|| {
        geo_error(GeoError::Unavailable("Geocoding not configured".to_string()))
    })?;

    let label = describe(geocoder, Coordinates::new(query.latitude, query.longitude))
        .await
        .map_err(geo_error)?;

    Ok(Json(serde_json::json!({ "label": label })))
}
