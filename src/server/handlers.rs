//! HTTP request handlers for the restaurant API.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::helpers::{paginate, to_views, PageWindow, RestaurantPage, RestaurantView};
use super::AppState;
use crate::geo::{bounding_box, filter_within_radius, Point};
use crate::models::Restaurant;
use crate::repository::RestaurantFilter;

/// Default search radius in kilometers when the query omits one.
const DEFAULT_RADIUS_KM: f64 = 3.0;

/// Run a repository job off the async runtime.
async fn blocking<T, F>(job: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::repository::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(job).await??)
}

/// Fetch one SQL-paginated page plus its total count and the country map.
async fn filtered_page(
    state: &AppState,
    filter: RestaurantFilter,
    window: PageWindow,
) -> Result<RestaurantPage, ApiError> {
    let restaurants = state.restaurants.clone();
    let countries = state.countries.clone();

    let (rows, total, names) = blocking(move || {
        let rows = restaurants.list(&filter, window.limit, window.offset)?;
        let total = restaurants.count(&filter)?;
        let names = countries.name_map()?;
        Ok((rows, total, names))
    })
    .await?;

    Ok(RestaurantPage {
        total_count: total,
        page: window.page,
        limit: window.limit,
        country: None,
        data: to_views(rows, &names),
    })
}

/// Resolve an optional country-code query parameter, 404ing on unknown codes.
async fn resolve_country_param(
    state: &AppState,
    code: Option<u16>,
) -> Result<Option<u16>, ApiError> {
    let Some(code) = code else { return Ok(None) };

    let countries = state.countries.clone();
    let country = blocking(move || countries.get_by_code(code)).await?;
    match country {
        Some(_) => Ok(Some(code)),
        None => Err(ApiError::not_found("Country not found")),
    }
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `GET /api/restaurants` — paginated listing of the whole directory.
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<RestaurantPage>, ApiError> {
    let window = paginate(params.page, params.limit);
    let page = filtered_page(&state, RestaurantFilter::default(), window).await?;
    Ok(Json(page))
}

/// `GET /api/restaurants/{id}` — single restaurant by dataset id.
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<RestaurantView>, ApiError> {
    let restaurants = state.restaurants.clone();
    let countries = state.countries.clone();

    let (restaurant, names) = blocking(move || {
        let restaurant = restaurants.get(restaurant_id)?;
        let names = countries.name_map()?;
        Ok((restaurant, names))
    })
    .await?;

    let restaurant = restaurant.ok_or_else(|| ApiError::not_found("Restaurant not found"))?;
    Ok(Json(RestaurantView::from_restaurant(restaurant, &names)))
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub lat: Option<f64>,
    pub long: Option<f64>,
    /// Kilometers; converted to meters internally.
    pub radius: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `GET /api/restaurants/search/location` — two-stage radius search.
///
/// Stage 1 is a bounding-box range query pushed down to the store without a
/// limit; stage 2 keeps candidates within the exact haversine distance. The
/// page window and `totalCount` apply to the stage-2 result, so a full page
/// is returned whenever enough true matches exist. The cost is reading every
/// bounding-box candidate for the query instead of a single store page.
pub async fn search_by_location(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<RestaurantPage>, ApiError> {
    let (Some(lat), Some(long)) = (params.lat, params.long) else {
        return Err(ApiError::bad_request(
            "Valid latitude and longitude are required",
        ));
    };
    let center = Point::new(lat, long)?;

    let radius_km = params.radius.unwrap_or(DEFAULT_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ApiError::bad_request(
            "radius must be a positive number of kilometers",
        ));
    }
    let radius_meters = radius_km * 1000.0;

    let window = paginate(params.page, params.limit);
    let bbox = bounding_box(&center, radius_meters)?;

    let restaurants = state.restaurants.clone();
    let countries = state.countries.clone();
    let (candidates, names) = blocking(move || {
        let candidates = restaurants.find_in_bounding_box(&bbox)?;
        let names = countries.name_map()?;
        Ok((candidates, names))
    })
    .await?;

    let matches = filter_within_radius(candidates, &center, radius_meters, Restaurant::position);
    let total = matches.len() as u64;
    let page_rows: Vec<Restaurant> = matches
        .into_iter()
        .skip(window.offset as usize)
        .take(window.limit as usize)
        .collect();

    Ok(Json(RestaurantPage {
        total_count: total,
        page: window.page,
        limit: window.limit,
        country: None,
        data: to_views(page_rows, &names),
    }))
}

/// `GET /api/restaurants/filter/country/{code}` — all restaurants in a country.
pub async fn filter_by_country(
    State(state): State<AppState>,
    Path(code): Path<u16>,
    Query(params): Query<PageQuery>,
) -> Result<Json<RestaurantPage>, ApiError> {
    let countries = state.countries.clone();
    let country = blocking(move || countries.get_by_code(code))
        .await?
        .ok_or_else(|| ApiError::not_found("Country not found for this code"))?;

    let window = paginate(params.page, params.limit);
    let mut page = filtered_page(&state, RestaurantFilter::by_country(code), window).await?;
    page.country = Some(country.name);
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct CostQuery {
    pub country: Option<u16>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `GET /api/restaurants/filter/spend/{avg_cost}` — exact average-cost match,
/// optionally narrowed to a country.
pub async fn filter_by_cost(
    State(state): State<AppState>,
    Path(avg_cost): Path<i64>,
    Query(params): Query<CostQuery>,
) -> Result<Json<RestaurantPage>, ApiError> {
    let country_code = resolve_country_param(&state, params.country).await?;

    let filter = RestaurantFilter {
        country_code,
        average_cost_for_two: Some(avg_cost),
        ..RestaurantFilter::default()
    };
    let window = paginate(params.page, params.limit);
    let page = filtered_page(&state, filter, window).await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct CuisineQuery {
    /// Comma-separated cuisine names.
    pub cuisine: Option<String>,
    pub country: Option<u16>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `GET /api/restaurants/filter/cuisines` — restaurants offering any of the
/// requested cuisines.
pub async fn filter_by_cuisines(
    State(state): State<AppState>,
    Query(params): Query<CuisineQuery>,
) -> Result<Json<RestaurantPage>, ApiError> {
    let cuisines: Vec<String> = params
        .cuisine
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if cuisines.is_empty() {
        return Err(ApiError::bad_request("Cuisines parameter is required"));
    }

    let country_code = resolve_country_param(&state, params.country).await?;

    let filter = RestaurantFilter {
        country_code,
        cuisines,
        ..RestaurantFilter::default()
    };
    let window = paginate(params.page, params.limit);
    let page = filtered_page(&state, filter, window).await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
    pub country: Option<u16>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `GET /api/restaurants/search` — substring search over name, city, and
/// locality fields. An empty term lists everything.
pub async fn search_restaurants(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<RestaurantPage>, ApiError> {
    let country_code = resolve_country_param(&state, params.country).await?;

    let filter = RestaurantFilter {
        country_code,
        search_term: params.search_term,
        ..RestaurantFilter::default()
    };
    let window = paginate(params.page, params.limit);
    let page = filtered_page(&state, filter, window).await?;
    Ok(Json(page))
}
