//! Restaurant records as stored in the directory.

use serde::{Deserialize, Serialize};

use crate::geo::Point;

/// A restaurant listing.
///
/// `restaurant_id` is the dataset's own unique key and doubles as the
/// database primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub name: String,
    /// Cuisine names, split from the dataset's comma-separated column.
    pub cuisines: Vec<String>,
    pub average_cost_for_two: i64,
    pub currency: String,
    pub has_table_booking: bool,
    pub has_online_delivery: bool,
    pub is_delivering: bool,
    pub switch_to_order_menu: bool,
    pub price_range: i64,
    pub menu_url: Option<String>,
    pub location: Location,
    pub user_rating: UserRating,
}

impl Restaurant {
    /// The stored position, uninspected. Records loaded from dirty data may
    /// carry coordinates the exact-distance stage will reject.
    pub fn position(&self) -> Point {
        Point {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
        }
    }
}

/// Where a restaurant sits, down to the neighborhood strings the dataset
/// provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub city_id: Option<i64>,
    /// Reference into the countries table.
    pub country_code: u16,
    pub locality: String,
    pub locality_verbose: String,
    pub zipcode: Option<String>,
}

/// Aggregated user rating as shipped in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    pub aggregate_rating: f64,
    pub rating_text: String,
    pub rating_color: String,
    pub votes: i64,
}
