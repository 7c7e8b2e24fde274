//! JSON API server for the restaurant directory.
//!
//! Endpoints cover browsing, filtering, and the geographic radius search:
//! - Paginated listing and id lookup
//! - Radius search around a coordinate (bounding box + haversine)
//! - Filters by country, average cost, and cuisines
//! - Substring search over names and localities

mod error;
mod handlers;
mod helpers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;

use crate::config::Settings;
use crate::repository::{CountryRepository, RestaurantRepository};

/// Shared state for the web server: the injected store handles.
#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<RestaurantRepository>,
    pub countries: Arc<CountryRepository>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_path = settings.database_path();

        Ok(Self {
            restaurants: Arc::new(RestaurantRepository::new(&db_path)?),
            countries: Arc::new(CountryRepository::new(&db_path)?),
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
