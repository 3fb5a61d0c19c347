use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overrides `database_url` from the config file when set.
pub const DATABASE_URL_ENV: &str = "DATAVISTA_DATABASE_URL";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// sqlx connection string for the users/datasets store
    pub database_url: String,
    /// Rows shown by the head/tail previews on the info view (default: 5)
    pub preview_rows: usize,
    /// Lower clamp for automatic histogram binning
    pub min_histogram_bins: usize,
    /// Upper clamp for automatic histogram binning
    pub max_histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            preview_rows: crate::analyser::logic::DEFAULT_PREVIEW_ROWS,
            min_histogram_bins: 5,
            max_histogram_bins: 50,
        }
    }
}

impl AppConfig {
    pub fn histogram_bins(&self) -> crate::analyser::logic::BinLimits {
        crate::analyser::logic::BinLimits {
            min: self.min_histogram_bins.max(1),
            max: self.max_histogram_bins.max(self.min_histogram_bins.max(1)),
        }
    }
}

fn default_database_url() -> String {
    let path = standard_data_dir().join("data.db");
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Platform data directory for the database and logs.
///
/// - Windows: `%APPDATA%/datavista`
/// - macOS: `~/Library/Application Support/datavista`
/// - Linux: `~/.local/share/datavista`
pub fn standard_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("datavista")
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("datavista")
        .join("config.json")
}

/// Loads the config file, falling back to defaults when it is missing or
/// unreadable, then applies environment overrides.
pub fn load_app_config() -> AppConfig {
    let mut config = load_app_config_from(&get_config_path());
    if let Ok(url) = std::env::var(DATABASE_URL_ENV)
        && !url.trim().is_empty()
    {
        config.database_url = url;
    }
    config
}

pub fn load_app_config_from(path: &std::path::Path) -> AppConfig {
    if path.exists()
        && let Ok(content) = std::fs::read_to_string(path)
    {
        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("Ignoring malformed config {}: {e}", path.display()),
        }
    }
    AppConfig::default()
}

pub fn save_app_config(config: &AppConfig) -> Result<()> {
    save_app_config_to(config, &get_config_path())
}

pub fn save_app_config_to(config: &AppConfig, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)
        .map_err(|e| ExplorerError::Config(format!("Failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = load_app_config_from(&dir.path().join("absent.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn test_round_trip_through_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            database_url: "sqlite::memory:".to_owned(),
            preview_rows: 10,
            ..AppConfig::default()
        };
        save_app_config_to(&config, &path)?;
        assert_eq!(load_app_config_from(&path), config);
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "preview_rows": 3 }"#)?;
        let config = load_app_config_from(&path);
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.max_histogram_bins, 50);
        Ok(())
    }

    #[test]
    fn test_bin_limits_never_invert() {
        let config = AppConfig {
            min_histogram_bins: 10,
            max_histogram_bins: 2,
            ..AppConfig::default()
        };
        let limits = config.histogram_bins();
        assert!(limits.min <= limits.max);
    }
}
