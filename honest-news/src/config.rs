//! Application configuration
//!
//! Everything has a default, so running without a config file behaves like
//! the reader app: "general" news and the mock backend's usual delays.
//!
//! ```json
//! {
//!   "defaultCategory": "technology",
//!   "latency": { "fetchMs": 250, "logoutMs": 0 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Category requested when none is given.
    pub default_category: String,
    pub latency: Latency,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_category: "general".to_string(),
            latency: Latency::default(),
        }
    }
}

/// Simulated delays of the mock backend, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Latency {
    pub fetch_ms: u64,
    pub refresh_ms: u64,
    pub login_ms: u64,
    pub register_ms: u64,
    pub preferences_ms: u64,
    pub logout_ms: u64,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            fetch_ms: 1000,
            refresh_ms: 500,
            login_ms: 1000,
            register_ms: 1000,
            preferences_ms: 500,
            logout_ms: 200,
        }
    }
}

impl Latency {
    /// No delay anywhere.
    pub const ZERO: Latency = Latency {
        fetch_ms: 0,
        refresh_ms: 0,
        login_ms: 0,
        register_ms: 0,
        preferences_ms: 0,
        logout_ms: 0,
    };

    pub fn fetch(&self) -> Duration {
        Duration::from_millis(self.fetch_ms)
    }

    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn login(&self) -> Duration {
        Duration::from_millis(self.login_ms)
    }

    pub fn register(&self) -> Duration {
        Duration::from_millis(self.register_ms)
    }

    pub fn preferences(&self) -> Duration {
        Duration::from_millis(self.preferences_ms)
    }

    pub fn logout(&self) -> Duration {
        Duration::from_millis(self.logout_ms)
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// - Without a path, returns `AppConfig::default()`.
    /// - With a path, the file must exist and parse as JSON.
    /// - The result is validated either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            None => AppConfig::default(),
            Some(path) => Self::from_file(path)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Checks:
    /// - The default category is not blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_category.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "defaultCategory must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.default_category, "general");
        assert_eq!(config.latency.fetch(), Duration::from_millis(1000));
        assert_eq!(config.latency.refresh(), Duration::from_millis(500));
        assert_eq!(config.latency.logout(), Duration::from_millis(200));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "latency": { "fetchMs": 10 } }"#).unwrap();
        assert_eq!(config.default_category, "general");
        assert_eq!(config.latency.fetch_ms, 10);
        assert_eq!(config.latency.login_ms, 1000);
    }

    #[test]
    fn test_blank_category_rejected() {
        let config = AppConfig {
            default_category: "  ".into(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/honest-news.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("honest-news-{}.json", std::process::id()));
        fs::write(&path, r#"{ "defaultCategory": "technology" }"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.default_category, "technology");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(ConfigError::ParseError { .. })
        ));

        let _ = fs::remove_file(&path);
    }
}
