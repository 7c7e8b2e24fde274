//! Runtime settings for the directory service.

use std::path::PathBuf;

/// Default SQLite database filename inside the data directory.
pub const DEFAULT_DATABASE_FILENAME: &str = "dinefind.db";

/// Default bind address for `serve` when none is given.
pub const DEFAULT_BIND: &str = "127.0.0.1:3050";

/// Where the service keeps its state.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename inside `data_dir`.
    pub database_filename: String,
}

impl Default for Settings {
    fn default() -> Self {
        // Default to ~/Documents/dinefind/ for user data.
        // Falls back gracefully: Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dinefind");

        Self {
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Resolve settings from the environment plus an optional CLI override.
    /// Precedence: `--data-dir` flag, then `DINEFIND_DATA`, then the default.
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir_flag {
            return Self::with_data_dir(dir);
        }
        if let Ok(dir) = std::env::var("DINEFIND_DATA") {
            if !dir.trim().is_empty() {
                return Self::with_data_dir(PathBuf::from(dir));
            }
        }
        Self::default()
    }

    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}

/// Parse a bind address that can be:
/// - Just a port: "3050" -> 127.0.0.1:3050
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3050
/// - Host and port: "0.0.0.0:3050" -> 0.0.0.0:3050
pub fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        anyhow::bail!("invalid port in bind address: {bind}");
    }

    Ok((bind.to_string(), 3050))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_forms() {
        assert_eq!(
            parse_bind_address("3099").unwrap(),
            ("127.0.0.1".to_string(), 3099)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0").unwrap(),
            ("0.0.0.0".to_string(), 3050)
        );
        assert_eq!(
            parse_bind_address("10.0.0.5:8080").unwrap(),
            ("10.0.0.5".to_string(), 8080)
        );
        assert!(parse_bind_address("10.0.0.5:notaport").is_err());
    }

    #[test]
    fn data_dir_flag_wins() {
        let settings = Settings::resolve(Some(PathBuf::from("/tmp/dinefind-test")));
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/dinefind-test"));
        assert_eq!(
            settings.database_path(),
            PathBuf::from("/tmp/dinefind-test/dinefind.db")
        );
    }
}
