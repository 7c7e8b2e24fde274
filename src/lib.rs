//! dinefind — restaurant directory API and data tools.
//!
//! Loads restaurant datasets (Zomato-style CSV exports) into a SQLite
//! database and serves a JSON API for browsing, filtering, and searching the
//! directory, including a geographic radius search built from a bounding-box
//! range query refined by exact haversine distances.

pub mod cli;
pub mod config;
pub mod geo;
pub mod import;
pub mod models;
pub mod repository;
pub mod server;
