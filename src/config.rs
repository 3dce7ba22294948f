//! Game configuration loaded from TOML.

use crate::dictionary::OpenDictConfig;
use crate::games::wordchain::DEFAULT_TURN_SECONDS;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for a human-vs-computer match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Dictionary search endpoint.
    #[serde(default = "default_endpoint")]
    endpoint: String,

    /// Environment variable holding the dictionary API key.
    #[serde(default = "default_api_key_env")]
    api_key_env: String,

    /// Maximum candidates requested per reply lookup.
    #[serde(default = "default_candidate_limit")]
    candidate_limit: u32,

    /// Seconds per turn. Fixed for the whole match.
    #[serde(default = "default_turn_seconds")]
    turn_seconds: u32,

    /// Per-request timeout for dictionary lookups.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

#[instrument]
fn default_endpoint() -> String {
    "https://opendict.korean.go.kr/api/search".to_string()
}

#[instrument]
fn default_api_key_env() -> String {
    "OPENDICT_API_KEY".to_string()
}

#[instrument]
fn default_candidate_limit() -> u32 {
    10
}

#[instrument]
fn default_turn_seconds() -> u32 {
    DEFAULT_TURN_SECONDS
}

#[instrument]
fn default_request_timeout_secs() -> u64 {
    5
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            candidate_limit: default_candidate_limit(),
            turn_seconds: default_turn_seconds(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(endpoint = %config.endpoint, turn_seconds = config.turn_seconds, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.turn_seconds == 0 {
            return Err(ConfigError::new("turn_seconds must be at least 1".to_string()));
        }
        if config.candidate_limit == 0 {
            return Err(ConfigError::new("candidate_limit must be at least 1".to_string()));
        }
        Ok(config)
    }

    /// Builds the dictionary gateway settings.
    ///
    /// Reads the API key from the variable named by `api_key_env`.
    #[instrument(skip(self), fields(api_key_env = %self.api_key_env))]
    pub fn gateway_config(&self) -> Result<OpenDictConfig, ConfigError> {
        let api_key = std::env::var(&self.api_key_env).map_err(|_| {
            ConfigError::new(format!("{} environment variable not set", self.api_key_env))
        })?;

        Ok(OpenDictConfig::new(
            self.endpoint.clone(),
            api_key,
            self.candidate_limit,
            Duration::from_secs(self.request_timeout_secs),
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
