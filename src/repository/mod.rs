//! Repository layer for SQLite persistence.
//!
//! Each repository owns the database path and opens a connection per
//! operation; schemas are created idempotently on construction. Callers own
//! and inject the repository handles they need — there is no process-wide
//! connection state.

pub mod country;
pub mod restaurant;

pub use country::CountryRepository;
pub use restaurant::{RestaurantFilter, RestaurantRepository};

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

/// Errors surfaced by the repositories. Store failures propagate as-is; the
/// repositories perform no retries.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(conn)
}

/// Collapse the "no rows" case into `None`.
fn to_option<T>(result: rusqlite::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
