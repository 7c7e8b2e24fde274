//! Pagination and response-shaping helpers shared by the handlers.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Restaurant, UserRating};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// A resolved pagination window: 1-based page, clamped limit, and the row
/// offset `(page - 1) * limit`.
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
    pub offset: u32,
}

pub fn paginate(page: Option<u32>, limit: Option<u32>) -> PageWindow {
    let page = page.unwrap_or(1).clamp(1, 100_000);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    PageWindow {
        page,
        limit,
        offset: (page - 1) * limit,
    }
}

/// The list-response envelope every collection endpoint returns.
///
/// `totalCount` is the number of matches after the authoritative filtering
/// stage, not the size of the returned page. An empty `data` array with
/// `totalCount` 0 is the uniform "no results" signal.
#[derive(Debug, Serialize)]
pub struct RestaurantPage {
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub data: Vec<RestaurantView>,
}

/// A restaurant as the API presents it: the stored record with the country
/// code resolved to a name. Field names mirror the dataset's original API.
#[derive(Debug, Serialize)]
pub struct RestaurantView {
    #[serde(rename = "restaurantId")]
    pub restaurant_id: i64,
    pub name: String,
    pub cuisines: Vec<String>,
    #[serde(rename = "averageCostForTwo")]
    pub average_cost_for_two: i64,
    pub currency: String,
    #[serde(rename = "hasTableBooking")]
    pub has_table_booking: bool,
    #[serde(rename = "hasOnlineDelivery")]
    pub has_online_delivery: bool,
    #[serde(rename = "isDelivering")]
    pub is_delivering: bool,
    #[serde(rename = "switchToOrderMenu")]
    pub switch_to_order_menu: bool,
    #[serde(rename = "priceRange")]
    pub price_range: i64,
    #[serde(rename = "menuUrl", skip_serializing_if = "Option::is_none")]
    pub menu_url: Option<String>,
    pub location: LocationView,
    pub user_rating: UserRating,
}

#[derive(Debug, Serialize)]
pub struct LocationView {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<i64>,
    /// Resolved country name, "Unknown" when the code has no entry.
    pub country: String,
    pub locality: String,
    pub locality_verbose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
}

impl RestaurantView {
    pub fn from_restaurant(restaurant: Restaurant, countries: &HashMap<u16, String>) -> Self {
        let country = countries
            .get(&restaurant.location.country_code)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            restaurant_id: restaurant.restaurant_id,
            name: restaurant.name,
            cuisines: restaurant.cuisines,
            average_cost_for_two: restaurant.average_cost_for_two,
            currency: restaurant.currency,
            has_table_booking: restaurant.has_table_booking,
            has_online_delivery: restaurant.has_online_delivery,
            is_delivering: restaurant.is_delivering,
            switch_to_order_menu: restaurant.switch_to_order_menu,
            price_range: restaurant.price_range,
            menu_url: restaurant.menu_url,
            location: LocationView {
                latitude: restaurant.location.latitude,
                longitude: restaurant.location.longitude,
                address: restaurant.location.address,
                city: restaurant.location.city,
                city_id: restaurant.location.city_id,
                country,
                locality: restaurant.location.locality,
                locality_verbose: restaurant.location.locality_verbose,
                zipcode: restaurant.location.zipcode,
            },
            user_rating: restaurant.user_rating,
        }
    }
}

pub fn to_views(
    restaurants: Vec<Restaurant>,
    countries: &HashMap<u16, String>,
) -> Vec<RestaurantView> {
    restaurants
        .into_iter()
        .map(|r| RestaurantView::from_restaurant(r, countries))
        .collect()
}
