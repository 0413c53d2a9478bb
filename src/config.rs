//! Updater configuration.
//!
//! Read from the optional `~/.heightsync/config.json`, then overridden by
//! environment variables:
//! - `DATABASE_UPDATE_PERIOD`: staleness period in milliseconds
//! - `HEIGHTSYNC_DB_PATH`: database file location

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::UpdateError;

pub const ENV_UPDATE_PERIOD: &str = "DATABASE_UPDATE_PERIOD";
pub const ENV_DB_PATH: &str = "HEIGHTSYNC_DB_PATH";

/// Seven days, in milliseconds.
pub const DEFAULT_UPDATE_PERIOD_MS: u64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdaterConfig {
    /// A new fetch is due once the last run is older than this.
    #[serde(default = "default_update_period_ms")]
    pub update_period_ms: u64,
    /// Database file; `None` means `~/.heightsync/heightsync.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_update_period_ms() -> u64 {
    DEFAULT_UPDATE_PERIOD_MS
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            update_period_ms: default_update_period_ms(),
            database_path: None,
        }
    }
}

impl UpdaterConfig {
    pub fn update_period(&self) -> Duration {
        Duration::from_millis(self.update_period_ms)
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_UPDATE_PERIOD) {
            self.update_period_ms = parse_update_period(&raw);
        }
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        self
    }
}

/// Milliseconds from `DATABASE_UPDATE_PERIOD`; zero or unparseable means the default.
pub fn parse_update_period(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => ms,
        _ => {
            log::warn!(
                "Ignoring {}={:?}; using default of {} ms",
                ENV_UPDATE_PERIOD,
                raw,
                DEFAULT_UPDATE_PERIOD_MS
            );
            DEFAULT_UPDATE_PERIOD_MS
        }
    }
}

/// Read a config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<UpdaterConfig, UpdateError> {
    if !path.exists() {
        return Ok(UpdaterConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| UpdateError::Configuration(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| UpdateError::Configuration(format!("Failed to parse config: {}", e)))
}

/// Load `~/.heightsync/config.json` (if present) plus environment overrides.
pub fn load_config() -> Result<UpdaterConfig, UpdateError> {
    let file_config = match dirs::home_dir() {
        Some(home) => load_config_from(&home.join(".heightsync").join("config.json"))?,
        None => UpdaterConfig::default(),
    };
    Ok(file_config.apply_env(|key| std::env::var(key).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = UpdaterConfig::default();
        assert_eq!(config.update_period(), Duration::from_secs(7 * 24 * 60 * 60));
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_parse_update_period() {
        assert_eq!(parse_update_period("60000"), 60_000);
        assert_eq!(parse_update_period(" 1000 "), 1_000);
        assert_eq!(parse_update_period("0"), DEFAULT_UPDATE_PERIOD_MS);
        assert_eq!(parse_update_period("soon"), DEFAULT_UPDATE_PERIOD_MS);
        assert_eq!(parse_update_period(""), DEFAULT_UPDATE_PERIOD_MS);
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            (ENV_UPDATE_PERIOD, "3600000"),
            (ENV_DB_PATH, "/tmp/heights.db"),
        ]
        .into_iter()
        .collect();

        let config = UpdaterConfig {
            update_period_ms: 5,
            database_path: None,
        }
        .apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.update_period_ms, 3_600_000);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/heights.db")));
    }

    #[test]
    fn test_missing_env_keeps_file_values() {
        let config = UpdaterConfig {
            update_period_ms: 42,
            database_path: Some(PathBuf::from("/data/h.db")),
        }
        .apply_env(|_| None);
        assert_eq!(config.update_period_ms, 42);
        assert_eq!(config.database_path, Some(PathBuf::from("/data/h.db")));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "updatePeriodMs": 86400000, "databasePath": "/srv/h.db" }"#)
            .unwrap();

        let config = load_config_from(&path).expect("parse");
        assert_eq!(config.update_period_ms, 86_400_000);
        assert_eq!(config.database_path, Some(PathBuf::from("/srv/h.db")));
    }

    #[test]
    fn test_load_config_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_from(&dir.path().join("absent.json")).expect("defaults");
        assert_eq!(config.update_period_ms, DEFAULT_UPDATE_PERIOD_MS);
    }

    #[test]
    fn test_load_config_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, UpdateError::Configuration(_)));
    }
}
