//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/restaurants", get(handlers::list_restaurants))
        .route("/api/restaurants/:id", get(handlers::get_restaurant))
        .route(
            "/api/restaurants/search",
            get(handlers::search_restaurants),
        )
        .route(
            "/api/restaurants/search/location",
            get(handlers::search_by_location),
        )
        .route(
            "/api/restaurants/filter/country/:code",
            get(handlers::filter_by_country),
        )
        .route(
            "/api/restaurants/filter/spend/:avg_cost",
            get(handlers::filter_by_cost),
        )
        .route(
            "/api/restaurants/filter/cuisines",
            get(handlers::filter_by_cuisines),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
