//! Restaurant dataset loader for Zomato-style CSV exports.

use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use super::{csv::CsvReader, LoadReport};
use crate::models::{Location, Restaurant, UserRating};
use crate::repository::RestaurantRepository;

/// Rows are written to the store in transactions of this size.
const BATCH_SIZE: usize = 500;

/// Column positions resolved from the export's header row.
struct Columns {
    id: usize,
    name: usize,
    country_code: usize,
    city: usize,
    address: usize,
    locality: usize,
    locality_verbose: usize,
    longitude: usize,
    latitude: usize,
    cuisines: usize,
    average_cost: usize,
    currency: usize,
    has_table_booking: usize,
    has_online_delivery: usize,
    is_delivering: usize,
    switch_to_order_menu: usize,
    price_range: usize,
    aggregate_rating: usize,
    rating_color: usize,
    rating_text: usize,
    votes: usize,
}

impl Columns {
    fn resolve<R: std::io::BufRead>(reader: &CsvReader<R>) -> anyhow::Result<Self> {
        let required = |name: &str| {
            reader
                .field_index(name)
                .with_context(|| format!("missing '{name}' column"))
        };

        Ok(Self {
            id: required("Restaurant ID")?,
            name: required("Restaurant Name")?,
            country_code: required("Country Code")?,
            city: required("City")?,
            address: required("Address")?,
            locality: required("Locality")?,
            locality_verbose: required("Locality Verbose")?,
            longitude: required("Longitude")?,
            latitude: required("Latitude")?,
            cuisines: required("Cuisines")?,
            average_cost: required("Average Cost for two")?,
            currency: required("Currency")?,
            has_table_booking: required("Has Table booking")?,
            has_online_delivery: required("Has Online delivery")?,
            is_delivering: required("Is delivering now")?,
            switch_to_order_menu: required("Switch to order menu")?,
            price_range: required("Price range")?,
            aggregate_rating: required("Aggregate rating")?,
            rating_color: required("Rating color")?,
            rating_text: required("Rating text")?,
            votes: required("Votes")?,
        })
    }
}

/// Load a restaurant CSV export into the store.
///
/// Rows missing a parseable id or coordinates are skipped and counted;
/// everything else degrades to defaults field by field, mirroring how the
/// export leaves optional columns blank.
pub fn load_restaurants(repo: &RestaurantRepository, path: &Path) -> anyhow::Result<LoadReport> {
    let mut reader = CsvReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let columns = Columns::resolve(&reader)?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid progress template"),
    );

    let mut batch: Vec<Restaurant> = Vec::with_capacity(BATCH_SIZE);
    let mut loaded = 0;
    let mut skipped = 0;

    while let Some(record) = reader.next_record()? {
        match parse_row(&columns, &record) {
            Some(restaurant) => batch.push(restaurant),
            None => {
                skipped += 1;
                warn!("skipping malformed restaurant row: {record:?}");
                continue;
            }
        }

        if batch.len() == BATCH_SIZE {
            loaded += repo.upsert_batch(&batch)?;
            batch.clear();
            progress.set_message(format!("{loaded} restaurants loaded"));
        }
    }

    if !batch.is_empty() {
        loaded += repo.upsert_batch(&batch)?;
    }
    progress.finish_with_message(format!("{loaded} restaurants loaded"));

    Ok(LoadReport { loaded, skipped })
}

fn parse_row(columns: &Columns, record: &[String]) -> Option<Restaurant> {
    let field = |idx: usize| record.get(idx).map(String::as_str).unwrap_or("").trim();

    let restaurant_id = field(columns.id).parse::<i64>().ok()?;
    let latitude = field(columns.latitude).parse::<f64>().ok()?;
    let longitude = field(columns.longitude).parse::<f64>().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }

    let cuisines = field(columns.cuisines)
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    Some(Restaurant {
        restaurant_id,
        name: field(columns.name).to_string(),
        cuisines,
        average_cost_for_two: field(columns.average_cost).parse().unwrap_or(0),
        currency: field(columns.currency).to_string(),
        has_table_booking: yes(field(columns.has_table_booking)),
        has_online_delivery: yes(field(columns.has_online_delivery)),
        is_delivering: yes(field(columns.is_delivering)),
        switch_to_order_menu: yes(field(columns.switch_to_order_menu)),
        price_range: field(columns.price_range).parse().unwrap_or(0),
        menu_url: None,
        location: Location {
            latitude,
            longitude,
            address: field(columns.address).to_string(),
            city: field(columns.city).to_string(),
            city_id: None,
            country_code: field(columns.country_code).parse().unwrap_or(0),
            locality: field(columns.locality).to_string(),
            locality_verbose: field(columns.locality_verbose).to_string(),
            zipcode: None,
        },
        user_rating: UserRating {
            aggregate_rating: field(columns.aggregate_rating).parse().unwrap_or(0.0),
            rating_text: field(columns.rating_text).to_string(),
            rating_color: field(columns.rating_color).to_string(),
            votes: field(columns.votes).parse().unwrap_or(0),
        },
    })
}

fn yes(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes")
}
