mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::geo::{GeoConfig, GoogleGeocoder, HostLocator, IpGeolocationClient};
use crate::store::MarkerStore;

/// Everything the handlers need: the store plus the geo collaborators.
/// Collaborators are optional; without an API key the corresponding routes
/// answer 503 instead of calling out with known-bad credentials.
#[derive(Clone)]
pub struct AppState {
    pub store: MarkerStore,
    pub geocoder: Option<GoogleGeocoder>,
    pub ip: Option<IpGeolocationClient>,
    pub device: HostLocator,
}

impl AppState {
    pub fn new(store: MarkerStore, config: GeoConfig) -> Self {
        let geocoder = config.geocode_api_key.map(|key| {
            GoogleGeocoder::new(key, config.language.clone(), config.region.clone())
        });
        let ip = config.ipgeo_api_key.map(IpGeolocationClient::new);

        Self {
            store,
            geocoder,
            ip,
            device: HostLocator::from_env(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Markers (list view, detail view, creation confirm, removal)
        .route("/markers", get(handlers::list_markers))
        .route("/markers", post(handlers::create_marker))
        .route("/markers/{id}", get(handlers::get_marker))
        .route("/markers/{id}", delete(handlers::delete_marker))
        // Location acquisition for the creation view's initial center
        .route("/location", get(handlers::resolve_location))
        // Place resolver
        .route("/places/search", get(handlers::search_places))
        .route("/places/reverse", get(handlers::reverse_lookup))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
