//! Dataset importers for the directory's CSV exports.

mod countries;
mod csv;
mod restaurants;

pub use countries::load_countries;
pub use csv::CsvReader;
pub use restaurants::load_restaurants;

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows written to the store.
    pub loaded: usize,
    /// Malformed rows skipped (logged individually).
    pub skipped: usize,
}
