//! End-to-end flow: load the CSV exports into a fresh database, then query
//! the API through the router.

use std::io::Write;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tempfile::tempdir;
use tower::ServiceExt;

use dinefind::config::Settings;
use dinefind::import::{load_countries, load_restaurants};
use dinefind::repository::{CountryRepository, RestaurantRepository};
use dinefind::server::{create_router, AppState};

const RESTAURANT_HEADER: &str = "Restaurant ID,Restaurant Name,Country Code,City,Address,\
Locality,Locality Verbose,Longitude,Latitude,Cuisines,Average Cost for two,Currency,\
Has Table booking,Has Online delivery,Is delivering now,Switch to order menu,\
Price range,Aggregate rating,Rating color,Rating text,Votes";

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn csv_load_feeds_the_radius_search() {
    let dir = tempdir().unwrap();
    let settings = Settings::with_data_dir(dir.path().to_path_buf());

    let countries_csv = dir.path().join("Country-Code.csv");
    let mut file = std::fs::File::create(&countries_csv).unwrap();
    writeln!(file, "Country Code,Country").unwrap();
    writeln!(file, "1,India").unwrap();

    let restaurants_csv = dir.path().join("zomato.csv");
    let mut file = std::fs::File::create(&restaurants_csv).unwrap();
    writeln!(file, "{RESTAURANT_HEADER}").unwrap();
    // Old Delhi, ~100 m from the query point below.
    writeln!(
        file,
        "308322,\"Karim's, Jama Masjid\",1,New Delhi,16 Gali Kababian,\
Jama Masjid,\"Jama Masjid, Old Delhi\",77.2334,28.6507,\"Mughlai, North Indian\",\
800,Indian Rupees(Rs.),Yes,No,No,No,3,4.6,3F7E00,Excellent,10934"
    )
    .unwrap();
    // Mumbai, ~1100 km away.
    writeln!(
        file,
        "310011,Trishna,1,Mumbai,7 Sai Baba Marg,Fort,\"Fort, Mumbai\",\
72.8330,18.9323,\"Seafood, Mangalorean\",1500,Indian Rupees(Rs.),Yes,No,No,No,4,\
4.9,3F7E00,Excellent,1843"
    )
    .unwrap();

    let country_repo = CountryRepository::new(&settings.database_path()).unwrap();
    let report = load_countries(&country_repo, &countries_csv).unwrap();
    assert_eq!(report.loaded, 1);

    let restaurant_repo = RestaurantRepository::new(&settings.database_path()).unwrap();
    let report = load_restaurants(&restaurant_repo, &restaurants_csv).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, 0);

    let state = AppState::new(&settings).unwrap();
    let app = create_router(state);

    // The whole directory is browsable.
    let (status, json) = get_json(&app, "/api/restaurants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalCount"], 2);

    // A 3 km radius around Jama Masjid reaches Karim's but not Mumbai.
    let (status, json) = get_json(
        &app,
        "/api/restaurants/search/location?lat=28.6515&long=77.2337",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalCount"], 1);
    assert_eq!(json["data"][0]["restaurantId"], 308322);
    assert_eq!(json["data"][0]["name"], "Karim's, Jama Masjid");
    assert_eq!(json["data"][0]["location"]["country"], "India");

    // Cuisine filtering sees the loader's split cuisine list.
    let (status, json) =
        get_json(&app, "/api/restaurants/filter/cuisines?cuisine=seafood").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalCount"], 1);
    assert_eq!(json["data"][0]["restaurantId"], 310011);
}
