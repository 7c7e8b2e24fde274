//! Country reference-data repository.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::{connect, to_option, Result};
use crate::models::Country;

/// SQLite-backed country repository.
#[derive(Debug, Clone)]
pub struct CountryRepository {
    db_path: PathBuf,
}

impl CountryRepository {
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
            CREATE TABLE IF NOT EXISTS countries (
                code INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }

    /// Insert or update a batch of countries in one transaction.
    pub fn upsert_batch(&self, countries: &[Country]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO countries (code, name)
                VALUES (?1, ?2)
                ON CONFLICT(code) DO UPDATE SET name = excluded.name
                "#,
            )?;
            for country in countries {
                stmt.execute(params![country.code, country.name])?;
            }
        }
        tx.commit()?;
        Ok(countries.len())
    }

    /// Look up a country by its numeric code.
    pub fn get_by_code(&self, code: u16) -> Result<Option<Country>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT code, name FROM countries WHERE code = ?")?;

        to_option(stmt.query_row(params![code], |row| {
            Ok(Country {
                code: row.get("code")?,
                name: row.get("name")?,
            })
        }))
    }

    /// Preload the full code-to-name map. Loaded once per request batch so
    /// per-record resolution is a plain map lookup.
    pub fn name_map(&self) -> Result<HashMap<u16, String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT code, name FROM countries")?;

        let map = stmt
            .query_map([], |row| Ok((row.get("code")?, row.get("name")?)))?
            .collect::<std::result::Result<HashMap<u16, String>, _>>()?;

        Ok(map)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM countries", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
