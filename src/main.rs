use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use pinpoint::api::{self, AppState};
use pinpoint::flow::CreationFlow;
use pinpoint::geo::{
    GeoConfig, GoogleGeocoder, HostLocator, IpGeolocationClient, UnconfiguredIpLocator,
};
use pinpoint::location::{LocationAcquisition, LocationState};
use pinpoint::models::{Coordinates, CreateMarkerInput};
use pinpoint::store::MarkerStore;

#[derive(Parser)]
#[command(name = "pinpoint")]
#[command(about = "Save named map markers and find your way back to them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Pinpoint server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// List saved markers
    List,
    /// Save a marker at explicit coordinates
    Add {
        name: String,
        latitude: f64,
        longitude: f64,
    },
    /// Remove a marker by id
    Remove { id: Uuid },
    /// Resolve the current location and describe it
    Locate,
    /// Run the creation flow: locate, describe, confirm under a name
    New {
        name: String,
        /// Override the device fix instead of reading the environment
        #[arg(long)]
        latitude: Option<f64>,
        #[arg(long)]
        longitude: Option<f64>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "pinpoint=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting Pinpoint server on port {}", port);

    let store = MarkerStore::open_default()?;
    store.migrate()?;

    let state = AppState::new(store, GeoConfig::from_env());
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Pinpoint server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Resolve a position using the host device fix (or an explicit override)
/// with the IP-geolocation fallback.
async fn resolve(config: &GeoConfig, fix: Option<Coordinates>) -> LocationState {
    let device = match fix {
        Some(coordinates) => HostLocator::new(Some(coordinates)),
        None => HostLocator::from_env(),
    };

    let mut acquisition = LocationAcquisition::new();
    match config.ipgeo_api_key.clone() {
        Some(key) => {
            acquisition
                .resolve(&device, &IpGeolocationClient::new(key))
                .await
        }
        None => acquisition.resolve(&device, &UnconfiguredIpLocator).await,
    }
}

fn geocoder(config: &GeoConfig) -> Option<GoogleGeocoder> {
    config
        .geocode_api_key
        .clone()
        .map(|key| GoogleGeocoder::new(key, config.language.clone(), config.region.clone()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port }) => serve(port).await?,
        Some(Commands::List) => {
            let store = MarkerStore::open_default()?;
            store.migrate()?;

            let markers = store.list();
            if markers.is_empty() {
                println!("No markers saved");
            }
            for marker in markers {
                println!(
                    "{}  {}  ({}, {})",
                    marker.id, marker.name, marker.latitude, marker.longitude
                );
            }
        }
        Some(Commands::Add {
            name,
            latitude,
            longitude,
        }) => {
            let store = MarkerStore::open_default()?;
            store.migrate()?;

            let marker = store.create(CreateMarkerInput {
                name,
                latitude,
                longitude,
            })?;
            println!("Saved marker {}", marker.id);
        }
        Some(Commands::Remove { id }) => {
            let store = MarkerStore::open_default()?;
            store.migrate()?;

            if store.remove(id)? {
                println!("Removed marker {}", id);
            } else {
                println!("No marker with id {}", id);
            }
        }
        Some(Commands::Locate) => {
            let config = GeoConfig::from_env();
            match resolve(&config, None).await {
                LocationState::Resolved(coordinates) => {
                    println!("({}, {})", coordinates.latitude, coordinates.longitude);
                    if let Some(geocoder) = geocoder(&config) {
                        match pinpoint::geo::describe(&geocoder, coordinates).await {
                            Ok(Some(label)) => println!("{}", label),
                            Ok(None) => println!("No description for this point"),
                            Err(error) => tracing::warn!("Reverse lookup failed: {}", error),
                        }
                    }
                }
                LocationState::Unavailable(failure) => println!("{}", failure.message()),
                _ => unreachable!("resolve returns a terminal state"),
            }
        }
        Some(Commands::New {
            name,
            latitude,
            longitude,
        }) => {
            let store = MarkerStore::open_default()?;
            store.migrate()?;

            let config = GeoConfig::from_env();
            let fix = match (latitude, longitude) {
                (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
                _ => None,
            };

            let center = match resolve(&config, fix).await {
                LocationState::Resolved(coordinates) => coordinates,
                LocationState::Unavailable(failure) => {
                    anyhow::bail!("Could not resolve a location: {}", failure.message())
                }
                _ => unreachable!("resolve returns a terminal state"),
            };

            let mut flow = CreationFlow::new(center);
            if let Some(geocoder) = geocoder(&config) {
                flow.settle(&geocoder, center).await;
            }
            if let Some(label) = flow.label() {
                println!("{}", label);
            }

            let marker = flow.confirm(&name, &store)?;
            println!(
                "Saved marker {} ({}, {})",
                marker.id, marker.latitude, marker.longitude
            );
        }
        None => serve(3000).await?,
    }

    Ok(())
}
