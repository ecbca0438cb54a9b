//! Persisted application settings stored as TOML in the `.skinalyze` root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Base URL of the prediction service when none is configured.
pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:5000";

/// Application settings loaded from the TOML config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the prediction service; `/predict` is appended per request.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Keep the previous result visible when a new image is selected.
    #[serde(default = "default_keep_last_result")]
    pub keep_last_result: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            keep_last_result: default_keep_last_result(),
        }
    }
}

impl AppConfig {
    /// Full URL of the predict operation.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.endpoint_url.trim_end_matches('/'))
    }
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

fn default_keep_last_result() -> bool {
    true
}

/// Errors that can occur while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Application directory could not be resolved or created.
    #[error(transparent)]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to read the config file.
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the config file as TOML.
    #[error("Failed to parse config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize settings to TOML.
    #[error("Failed to serialize config: {0}")]
    SerializeToml(toml::ser::Error),
    /// Failed to create a parent directory for the config file.
    #[error("Failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write config file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configured endpoint is not a valid URL.
    #[error("Invalid endpoint URL {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },
}

/// Path of the config file inside the app root dir.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the configuration, falling back to defaults when no file exists.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_from_path(&path)
}

/// Load and validate configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    validate_endpoint(&config.endpoint_url)?;
    Ok(config)
}

/// Persist configuration to disk, overwriting any previous contents.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_path()?;
    save_to_path(config, &path)
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(ConfigError::SerializeToml)?;
    std::fs::write(path, data).map_err(|source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    url::Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
        url: endpoint.to_string(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_point_at_local_endpoint_and_keep_results() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert!(config.keep_last_result);
    }

    #[test]
    fn predict_url_joins_without_double_slash() {
        let config = AppConfig {
            endpoint_url: "http://localhost:5000/".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.predict_url(), "http://localhost:5000/predict");
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig {
            endpoint_url: "http://10.0.0.7:8080".into(),
            keep_last_result: false,
        };
        save_to_path(&config, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint_url = \"http://host:9000\"\n").unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.endpoint_url, "http://host:9000");
        assert!(loaded.keep_last_result);
    }

    #[test]
    fn rejects_invalid_endpoint_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint_url = \"not a url\"\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
    }
}
