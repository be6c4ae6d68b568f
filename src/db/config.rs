use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;

use crate::error::{HotelError, Result};

/// Environment variable that overrides the settings file.
pub const CONNECTION_STRING_VAR: &str = "EFHOTEL_CONNECTION_STRING";

/// Settings file looked up next to the crate manifest by default.
pub const SETTINGS_FILE: &str = "appsettings.toml";

#[derive(Debug, Deserialize)]
struct Settings {
    connection_strings: Option<ConnectionStrings>,
}

#[derive(Debug, Deserialize)]
struct ConnectionStrings {
    default_connection: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub connection_string: String,
}

impl Config {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self { connection_string: connection_string.into() }
    }

    /// Database file the connection string points at, or `None` for an
    /// in-memory store.
    pub fn db_path(&self) -> Option<PathBuf> {
        let conn_str = self.connection_string.trim();
        let path = conn_str.strip_prefix("sqlite://").unwrap_or(conn_str);

        if path == ":memory:" {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

pub fn default_settings_path() -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), SETTINGS_FILE].iter().collect()
}

/// Resolve the connection string from the environment, falling back to
/// the settings file.
pub fn get_config(settings_path: Option<&Path>) -> Result<Config> {
    let from_env = env::var(CONNECTION_STRING_VAR).ok();
    let path = settings_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_settings_path);

    resolve_config(from_env, &path)
}

fn resolve_config(from_env: Option<String>, path: &Path) -> Result<Config> {
    if let Some(conn_str) = from_env {
        log::debug!("Connection string taken from {}", CONNECTION_STRING_VAR);
        return validated(conn_str, CONNECTION_STRING_VAR);
    }

    let cfg_str = fs::read_to_string(path).map_err(|e| {
        HotelError::config(format!(
            "Failed to read settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    let settings: Settings = toml::from_str(&cfg_str).map_err(|e| {
        HotelError::config(format!(
            "Failed to parse settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    match settings.connection_strings.and_then(|c| c.default_connection) {
        None => Err(HotelError::config(format!(
            "No connection_strings.default_connection in {}",
            path.display()
        ))),
        Some(conn_str) => validated(conn_str, &path.display().to_string()),
    }
}

fn validated(conn_str: String, source: &str) -> Result<Config> {
    let config = Config::new(conn_str);

    match config.db_path() {
        Some(path) if path.as_os_str().is_empty() => Err(HotelError::config(
            format!("Empty connection string in {}", source),
        )),
        // key=value;... belongs to a server database, not a SQLite path
        _ if config.connection_string.contains(['=', ';']) => {
            Err(HotelError::config(format!(
                "Malformed connection string in {}: expected a SQLite path",
                source
            )))
        }
        _ => Ok(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_connection_string_from_file() {
        let file = settings_file(
            "[connection_strings]\ndefault_connection = \"hotels.db\"\n",
        );
        let config = resolve_config(None, file.path()).unwrap();
        assert_eq!(config.connection_string, "hotels.db");
        assert_eq!(config.db_path(), Some(PathBuf::from("hotels.db")));
    }

    #[test]
    fn env_overrides_file() {
        let config = resolve_config(
            Some("sqlite://other.db".to_string()),
            Path::new("/nonexistent/appsettings.toml"),
        )
        .unwrap();
        assert_eq!(config.db_path(), Some(PathBuf::from("other.db")));
    }

    #[test]
    fn memory_connection_has_no_path() {
        assert_eq!(Config::new(":memory:").db_path(), None);
        assert_eq!(Config::new("sqlite://:memory:").db_path(), None);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = resolve_config(None, Path::new("/nonexistent/appsettings.toml"))
            .unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let file = settings_file("[connection_strings]\n");
        let err = resolve_config(None, file.path()).unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));

        let file = settings_file("title = \"hotels\"\n");
        let err = resolve_config(None, file.path()).unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));
    }

    #[test]
    fn malformed_settings_are_a_config_error() {
        let file = settings_file("[connection_strings\n");
        let err = resolve_config(None, file.path()).unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));
    }

    #[test]
    fn server_style_connection_string_is_rejected() {
        let file = settings_file(
            "[connection_strings]\ndefault_connection = \"Server=.;Database=Hotels\"\n",
        );
        let err = resolve_config(None, file.path()).unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));

        let err = resolve_config(Some("Data Source=hotels.db".to_string()), Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));

        let err = resolve_config(Some("hotels;v2.db".to_string()), Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));
    }

    #[test]
    fn blank_connection_string_is_rejected() {
        let file = settings_file(
            "[connection_strings]\ndefault_connection = \"  \"\n",
        );
        let err = resolve_config(None, file.path()).unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));

        let err = resolve_config(Some("sqlite://".to_string()), Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, HotelError::Config(_)));
    }
}
