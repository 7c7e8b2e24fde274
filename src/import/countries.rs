//! Country-code reference loader.

use std::path::Path;

use anyhow::Context;
use tracing::warn;

use super::{csv::CsvReader, LoadReport};
use crate::models::Country;
use crate::repository::CountryRepository;

/// Load the `Country-Code.csv` reference file into the store.
pub fn load_countries(repo: &CountryRepository, path: &Path) -> anyhow::Result<LoadReport> {
    let mut reader = CsvReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let code_idx = reader
        .field_index("Country Code")
        .context("missing 'Country Code' column")?;
    let name_idx = reader
        .field_index("Country")
        .context("missing 'Country' column")?;

    let mut countries = Vec::new();
    let mut skipped = 0;
    while let Some(record) = reader.next_record()? {
        let code = record
            .get(code_idx)
            .and_then(|v| v.trim().parse::<u16>().ok());
        let name = record
            .get(name_idx)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        match (code, name) {
            (Some(code), Some(name)) => countries.push(Country::new(code, name)),
            _ => {
                skipped += 1;
                warn!("skipping malformed country row: {record:?}");
            }
        }
    }

    let loaded = repo.upsert_batch(&countries)?;
    Ok(LoadReport { loaded, skipped })
}
