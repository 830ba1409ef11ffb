//! Runtime configuration from the environment, with CLI overrides applied
//! on top.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::errors::ErrorCode;

pub const STATE_FILE_VAR: &str = "SCOREKEEPER_STATE_FILE";
pub const LOG_JSON_VAR: &str = "SCOREKEEPER_LOG_JSON";
pub const DEFAULT_STATE_FILE: &str = "uno-game-state.json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a boolean (true/false/1/0/yes/no), got '{value}'")]
    InvalidBool {
        var: &'static str,
        value: String,
    },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ConfigError
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where the game blob is stored.
    pub state_file: PathBuf,
    /// Emit logs as JSON lines instead of plain text.
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        if let Some(path) = lookup(STATE_FILE_VAR) {
            let path = path.trim();
            if path.is_empty() {
                return Err(ConfigError::Empty {
                    var: STATE_FILE_VAR,
                });
            }
            config.state_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup(LOG_JSON_VAR) {
            config.log_json = parse_bool(LOG_JSON_VAR, &raw)?;
        }
        Ok(config)
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, state_file: Option<PathBuf>, log_json: bool) -> Self {
        if let Some(path) = state_file {
            self.state_file = path;
        }
        self.log_json |= log_json;
        self
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_owned(),
        }),
    }
}
