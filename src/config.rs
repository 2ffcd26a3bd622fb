//! Application configuration.
//!
//! Read from an optional `lexis.toml` (next to the data directory or
//! passed via `--config`), with environment-variable overrides for
//! secrets. Missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Daily quota of distinct words the debt ledger expects.
pub const DEFAULT_DAILY_QUOTA: u32 = 100;

/// Day boundaries are pinned to a fixed UTC offset so debt results are
/// stable across deployment environments; defaults to +10 (AEST).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 10;

const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Port the HTTP API listens on.
    pub port: u16,
    /// Data directory; defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Daily distinct-word quota used by the debt calculator.
    pub daily_quota: u32,
    /// Fixed UTC offset (hours) defining the ledger day boundary.
    pub utc_offset_hours: i32,
    /// Assist (AI generation) collaborator settings.
    pub assist: AssistConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: None,
            daily_quota: DEFAULT_DAILY_QUOTA,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            assist: AssistConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AssistConfig {
    /// API key for the OpenAI-compatible endpoint. Overridden by
    /// `LEXIS_ASSIST_API_KEY`; unset disables the assist endpoints.
    pub api_key: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "Claude-Haiku-4.5".to_string(),
            base_url: "https://api.poe.com/v1".to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Load configuration from `path` if it exists, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: p.to_path_buf(),
                    source,
                })?
            }
            Some(p) => {
                log::info!("Config file {} not found, using defaults", p.display());
                Config::default()
            }
            None => Config::default(),
        };

        if let Ok(key) = std::env::var("LEXIS_ASSIST_API_KEY") {
            if !key.is_empty() {
                config.assist.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("LEXIS_ASSIST_MODEL") {
            if !model.is_empty() {
                config.assist.model = model;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 5001);
        assert_eq!(config.daily_quota, 100);
        assert_eq!(config.utc_offset_hours, 10);
        assert!(config.assist.api_key.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080\ndaily_quota = 50").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.daily_quota, 50);
        // Untouched fields keep their defaults
        assert_eq!(config.utc_offset_hours, 10);
    }

    #[test]
    fn test_load_missing_file_is_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/lexis.toml"))).unwrap();
        assert_eq!(config.port, 5001);
    }
}
