//! Restaurant repository: persistence plus the query pushdown the API
//! relies on (range scans for the radius search, combined filters with
//! SQL-side pagination for everything else).

use std::path::{Path, PathBuf};

use rusqlite::{params, params_from_iter, Connection, Row, ToSql};

use super::{connect, to_option, Result};
use crate::geo::BoundingBox;
use crate::models::{Location, Restaurant, UserRating};

const SELECT_COLUMNS: &str = "restaurant_id, name, cuisines, average_cost_for_two, currency, \
     has_table_booking, has_online_delivery, is_delivering, switch_to_order_menu, price_range, \
     menu_url, latitude, longitude, address, city, city_id, country_code, locality, \
     locality_verbose, zipcode, aggregate_rating, rating_text, rating_color, votes";

/// Filter terms combined with AND. Empty/None members are skipped, so the
/// default value matches every row.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub country_code: Option<u16>,
    pub average_cost_for_two: Option<i64>,
    /// Match rows offering any of these cuisines (case-insensitive).
    pub cuisines: Vec<String>,
    /// Case-insensitive substring match over name, city, locality, and
    /// locality_verbose.
    pub search_term: Option<String>,
}

impl RestaurantFilter {
    pub fn by_country(code: u16) -> Self {
        Self {
            country_code: Some(code),
            ..Self::default()
        }
    }

    /// Render the WHERE clause (with leading ` WHERE`, or empty) and its
    /// bound parameters.
    fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut terms: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(code) = self.country_code {
            terms.push("country_code = ?".into());
            values.push(Box::new(i64::from(code)));
        }

        if let Some(cost) = self.average_cost_for_two {
            terms.push("average_cost_for_two = ?".into());
            values.push(Box::new(cost));
        }

        if !self.cuisines.is_empty() {
            let placeholders = vec!["?"; self.cuisines.len()].join(", ");
            terms.push(format!(
                "EXISTS (SELECT 1 FROM json_each(restaurants.cuisines) \
                 WHERE lower(json_each.value) IN ({placeholders}))"
            ));
            for cuisine in &self.cuisines {
                values.push(Box::new(cuisine.trim().to_lowercase()));
            }
        }

        if let Some(term) = self.search_term.as_deref() {
            let term = term.trim();
            if !term.is_empty() {
                terms.push(
                    "(name LIKE ? OR city LIKE ? OR locality LIKE ? OR locality_verbose LIKE ?)"
                        .into(),
                );
                let pattern = format!("%{term}%");
                for _ in 0..4 {
                    values.push(Box::new(pattern.clone()));
                }
            }
        }

        if terms.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", terms.join(" AND ")), values)
        }
    }
}

/// SQLite-backed restaurant repository.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    db_path: PathBuf,
}

impl RestaurantRepository {
    /// Open the repository, creating the schema if needed.
    pub fn new(db_path: &Path) -> Result<Self> {
        let repo = Self {
            db_path: db_path.to_path_buf(),
        };
        repo.init_schema()?;
        Ok(repo)
    }

    fn connect(&self) -> Result<Connection> {
        connect(&self.db_path)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                restaurant_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                cuisines TEXT NOT NULL DEFAULT '[]',
                average_cost_for_two INTEGER NOT NULL DEFAULT 0,
                currency TEXT NOT NULL DEFAULT '',
                has_table_booking INTEGER NOT NULL DEFAULT 0,
                has_online_delivery INTEGER NOT NULL DEFAULT 0,
                is_delivering INTEGER NOT NULL DEFAULT 0,
                switch_to_order_menu INTEGER NOT NULL DEFAULT 0,
                price_range INTEGER NOT NULL DEFAULT 0,
                menu_url TEXT,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                address TEXT NOT NULL DEFAULT '',
                city TEXT NOT NULL DEFAULT '',
                city_id INTEGER,
                country_code INTEGER NOT NULL,
                locality TEXT NOT NULL DEFAULT '',
                locality_verbose TEXT NOT NULL DEFAULT '',
                zipcode TEXT,
                aggregate_rating REAL NOT NULL DEFAULT 0,
                rating_text TEXT NOT NULL DEFAULT '',
                rating_color TEXT NOT NULL DEFAULT '',
                votes INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_restaurants_position
                ON restaurants(latitude, longitude);
            CREATE INDEX IF NOT EXISTS idx_restaurants_country
                ON restaurants(country_code);
            CREATE INDEX IF NOT EXISTS idx_restaurants_cost
                ON restaurants(average_cost_for_two);
        "#,
        )?;
        Ok(())
    }

    /// Insert or update a batch of restaurants in one transaction.
    pub fn upsert_batch(&self, restaurants: &[Restaurant]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO restaurants (
                    restaurant_id, name, cuisines, average_cost_for_two, currency,
                    has_table_booking, has_online_delivery, is_delivering,
                    switch_to_order_menu, price_range, menu_url, latitude, longitude,
                    address, city, city_id, country_code, locality, locality_verbose,
                    zipcode, aggregate_rating, rating_text, rating_color, votes
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                    ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24
                )
                ON CONFLICT(restaurant_id) DO UPDATE SET
                    name = excluded.name,
                    cuisines = excluded.cuisines,
                    average_cost_for_two = excluded.average_cost_for_two,
                    currency = excluded.currency,
                    has_table_booking = excluded.has_table_booking,
                    has_online_delivery = excluded.has_online_delivery,
                    is_delivering = excluded.is_delivering,
                    switch_to_order_menu = excluded.switch_to_order_menu,
                    price_range = excluded.price_range,
                    menu_url = excluded.menu_url,
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    address = excluded.address,
                    city = excluded.city,
                    city_id = excluded.city_id,
                    country_code = excluded.country_code,
                    locality = excluded.locality,
                    locality_verbose = excluded.locality_verbose,
                    zipcode = excluded.zipcode,
                    aggregate_rating = excluded.aggregate_rating,
                    rating_text = excluded.rating_text,
                    rating_color = excluded.rating_color,
                    votes = excluded.votes
                "#,
            )?;
            for restaurant in restaurants {
                let cuisines_json = serde_json::to_string(&restaurant.cuisines)?;
                stmt.execute(params![
                    restaurant.restaurant_id,
                    restaurant.name,
                    cuisines_json,
                    restaurant.average_cost_for_two,
                    restaurant.currency,
                    restaurant.has_table_booking,
                    restaurant.has_online_delivery,
                    restaurant.is_delivering,
                    restaurant.switch_to_order_menu,
                    restaurant.price_range,
                    restaurant.menu_url,
                    restaurant.location.latitude,
                    restaurant.location.longitude,
                    restaurant.location.address,
                    restaurant.location.city,
                    restaurant.location.city_id,
                    restaurant.location.country_code,
                    restaurant.location.locality,
                    restaurant.location.locality_verbose,
                    restaurant.location.zipcode,
                    restaurant.user_rating.aggregate_rating,
                    restaurant.user_rating.rating_text,
                    restaurant.user_rating.rating_color,
                    restaurant.user_rating.votes,
                ])?;
            }
        }
        tx.commit()?;
        Ok(restaurants.len())
    }

    /// Look up a restaurant by its dataset id.
    pub fn get(&self, restaurant_id: i64) -> Result<Option<Restaurant>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM restaurants WHERE restaurant_id = ?"
        ))?;

        to_option(stmt.query_row(params![restaurant_id], map_row))
    }

    /// One page of rows matching `filter`, ordered by restaurant id.
    pub fn list(
        &self,
        filter: &RestaurantFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Restaurant>> {
        let (where_sql, mut values) = filter.where_clause();
        values.push(Box::new(i64::from(limit)));
        values.push(Box::new(i64::from(offset)));

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM restaurants{where_sql} \
             ORDER BY restaurant_id LIMIT ? OFFSET ?"
        ))?;

        let rows = stmt
            .query_map(params_from_iter(values.iter()), map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Total number of rows matching `filter`.
    pub fn count(&self, filter: &RestaurantFilter) -> Result<u64> {
        let (where_sql, values) = filter.where_clause();

        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM restaurants{where_sql}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Stage-1 range query for the radius search: every row whose stored
    /// position falls inside the box, bounds inclusive on both axes. No
    /// limit — the exact-distance stage and pagination run on the caller's
    /// side, over the full candidate set.
    pub fn find_in_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Restaurant>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM restaurants \
             WHERE latitude BETWEEN ?1 AND ?2 AND longitude BETWEEN ?3 AND ?4 \
             ORDER BY restaurant_id"
        ))?;

        let rows = stmt
            .query_map(
                params![bbox.min_lat, bbox.max_lat, bbox.min_lng, bbox.max_lng],
                map_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Restaurant> {
    // A corrupt cuisine column degrades to an empty list rather than failing
    // the whole page.
    let cuisines: Vec<String> =
        serde_json::from_str(&row.get::<_, String>("cuisines")?).unwrap_or_default();

    Ok(Restaurant {
        restaurant_id: row.get("restaurant_id")?,
        name: row.get("name")?,
        cuisines,
        average_cost_for_two: row.get("average_cost_for_two")?,
        currency: row.get("currency")?,
        has_table_booking: row.get("has_table_booking")?,
        has_online_delivery: row.get("has_online_delivery")?,
        is_delivering: row.get("is_delivering")?,
        switch_to_order_menu: row.get("switch_to_order_menu")?,
        price_range: row.get("price_range")?,
        menu_url: row.get("menu_url")?,
        location: Location {
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            address: row.get("address")?,
            city: row.get("city")?,
            city_id: row.get("city_id")?,
            country_code: row.get("country_code")?,
            locality: row.get("locality")?,
            locality_verbose: row.get("locality_verbose")?,
            zipcode: row.get("zipcode")?,
        },
        user_rating: UserRating {
            aggregate_rating: row.get("aggregate_rating")?,
            rating_text: row.get("rating_text")?,
            rating_color: row.get("rating_color")?,
            votes: row.get("votes")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(id: i64, name: &str, lat: f64, lng: f64) -> Restaurant {
        Restaurant {
            restaurant_id: id,
            name: name.to_string(),
            cuisines: vec!["North Indian".to_string(), "Mughlai".to_string()],
            average_cost_for_two: 800,
            currency: "Indian Rupees(Rs.)".to_string(),
            has_table_booking: true,
            has_online_delivery: false,
            is_delivering: false,
            switch_to_order_menu: false,
            price_range: 3,
            menu_url: None,
            location: Location {
                latitude: lat,
                longitude: lng,
                address: "12 Connaught Place".to_string(),
                city: "New Delhi".to_string(),
                city_id: None,
                country_code: 1,
                locality: "Connaught Place".to_string(),
                locality_verbose: "Connaught Place, New Delhi".to_string(),
                zipcode: None,
            },
            user_rating: UserRating {
                aggregate_rating: 4.2,
                rating_text: "Very Good".to_string(),
                rating_color: "5BA829".to_string(),
                votes: 1203,
            },
        }
    }

    fn open_repo(dir: &tempfile::TempDir) -> RestaurantRepository {
        RestaurantRepository::new(&dir.path().join("test.db")).unwrap()
    }

    #[test]
    fn upsert_and_get_roundtrip() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        let original = sample(101, "Karim's", 28.6507, 77.2334);
        repo.upsert_batch(std::slice::from_ref(&original)).unwrap();

        let loaded = repo.get(101).unwrap().unwrap();
        assert_eq!(loaded, original);
        assert_eq!(repo.get(999).unwrap(), None);
    }

    #[test]
    fn upsert_overwrites_on_conflict() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        repo.upsert_batch(&[sample(101, "Old Name", 28.0, 77.0)])
            .unwrap();
        repo.upsert_batch(&[sample(101, "New Name", 28.0, 77.0)])
            .unwrap();

        assert_eq!(repo.count(&RestaurantFilter::default()).unwrap(), 1);
        assert_eq!(repo.get(101).unwrap().unwrap().name, "New Name");
    }

    #[test]
    fn list_pages_in_id_order() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        let batch: Vec<Restaurant> = (1..=25)
            .map(|i| sample(i, &format!("Restaurant {i}"), 28.6, 77.2))
            .collect();
        repo.upsert_batch(&batch).unwrap();

        let filter = RestaurantFilter::default();
        let first = repo.list(&filter, 10, 0).unwrap();
        let third = repo.list(&filter, 10, 20).unwrap();

        assert_eq!(first.len(), 10);
        assert_eq!(first[0].restaurant_id, 1);
        assert_eq!(third.len(), 5);
        assert_eq!(third[4].restaurant_id, 25);
        assert_eq!(repo.count(&filter).unwrap(), 25);
    }

    #[test]
    fn bounding_box_query_is_inclusive() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        repo.upsert_batch(&[
            sample(1, "On Min Corner", 28.0, 77.0),
            sample(2, "Inside", 28.5, 77.5),
            sample(3, "On Max Corner", 29.0, 78.0),
            sample(4, "Outside", 30.0, 80.0),
        ])
        .unwrap();

        let bbox = BoundingBox {
            min_lat: 28.0,
            max_lat: 29.0,
            min_lng: 77.0,
            max_lng: 78.0,
        };
        let hits = repo.find_in_bounding_box(&bbox).unwrap();
        let ids: Vec<i64> = hits.iter().map(|r| r.restaurant_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn filters_combine_with_and() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        let mut cheap = sample(1, "Saravana Bhavan", 28.63, 77.21);
        cheap.average_cost_for_two = 300;
        cheap.cuisines = vec!["South Indian".to_string()];
        let mut pricey = sample(2, "Bukhara", 28.60, 77.17);
        pricey.average_cost_for_two = 5000;
        let mut abroad = sample(3, "Nando's", -26.2, 28.0);
        abroad.location.country_code = 189;
        abroad.average_cost_for_two = 300;
        repo.upsert_batch(&[cheap, pricey, abroad]).unwrap();

        let filter = RestaurantFilter {
            country_code: Some(1),
            average_cost_for_two: Some(300),
            ..RestaurantFilter::default()
        };
        let hits = repo.list(&filter, 10, 0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].restaurant_id, 1);
        assert_eq!(repo.count(&filter).unwrap(), 1);
    }

    #[test]
    fn cuisine_filter_is_case_insensitive_membership() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        let mut dosa = sample(1, "Dosa Corner", 28.6, 77.2);
        dosa.cuisines = vec!["South Indian".to_string(), "Kerala".to_string()];
        let mut pizza = sample(2, "Slice House", 28.6, 77.2);
        pizza.cuisines = vec!["Pizza".to_string(), "Italian".to_string()];
        repo.upsert_batch(&[dosa, pizza]).unwrap();

        let filter = RestaurantFilter {
            cuisines: vec!["south indian".to_string(), "Burgers".to_string()],
            ..RestaurantFilter::default()
        };
        let hits = repo.list(&filter, 10, 0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].restaurant_id, 1);
    }

    #[test]
    fn search_term_matches_name_and_locality() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        let mut by_name = sample(1, "Delhi Darbar", 19.07, 72.87);
        by_name.location.city = "Mumbai".to_string();
        by_name.location.locality = "Colaba".to_string();
        by_name.location.locality_verbose = "Colaba, Mumbai".to_string();
        let by_locality = sample(2, "Karim's", 28.65, 77.23);
        let mut unrelated = sample(3, "Slice House", 40.7, -74.0);
        unrelated.location.city = "New York".to_string();
        unrelated.location.locality = "SoHo".to_string();
        unrelated.location.locality_verbose = "SoHo, New York".to_string();
        repo.upsert_batch(&[by_name, by_locality, unrelated]).unwrap();

        let filter = RestaurantFilter {
            search_term: Some("delhi".to_string()),
            ..RestaurantFilter::default()
        };
        let hits = repo.list(&filter, 10, 0).unwrap();
        let ids: Vec<i64> = hits.iter().map(|r| r.restaurant_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(repo.count(&filter).unwrap(), 2);
    }

    #[test]
    fn blank_search_term_matches_everything() {
        let dir = tempdir().unwrap();
        let repo = open_repo(&dir);

        repo.upsert_batch(&[sample(1, "A", 28.6, 77.2), sample(2, "B", 28.6, 77.2)])
            .unwrap();

        let filter = RestaurantFilter {
            search_term: Some("   ".to_string()),
            ..RestaurantFilter::default()
        };
        assert_eq!(repo.count(&filter).unwrap(), 2);
    }
}
