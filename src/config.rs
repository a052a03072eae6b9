//! Playback configuration
//!
//! Values are layered: defaults, then an optional JSON file, then
//! `WEREWOLF_*` environment variables. Command-line flags are applied last by
//! the binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_SERVER_URL: &str = "WEREWOLF_SERVER_URL";
pub const ENV_AUTOPLAY_DELAY_MS: &str = "WEREWOLF_AUTOPLAY_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Backend base URL, without the `/api` suffix
    pub server_url: String,
    /// Pause between autoplay ticks; 0 runs as fast as the scheduler permits
    pub autoplay_delay_ms: u64,
    /// Whole-request timeout. Phases run model inference server-side and can be slow.
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Parameters used when a new game is started without explicit values
    pub new_game: NewGameDefaults,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            autoplay_delay_ms: 0,
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            new_game: NewGameDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewGameDefaults {
    pub players: u32,
    pub wolves: u32,
    pub seed: i64,
}

impl Default for NewGameDefaults {
    fn default() -> Self {
        Self {
            players: 7,
            wolves: 2,
            seed: 42,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

impl PlaybackConfig {
    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }

    /// Parse a JSON config document; missing fields keep their defaults
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load from an optional JSON file, then apply environment overrides
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let display = path.display().to_string();
                let content = tokio::fs::read_to_string(path).await.map_err(|source| {
                    ConfigError::Read {
                        path: display.clone(),
                        source,
                    }
                })?;
                Self::from_json(&content).map_err(|source| ConfigError::Parse {
                    path: display,
                    source,
                })?
            }
            None => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(value) = lookup(ENV_AUTOPLAY_DELAY_MS) {
            self.autoplay_delay_ms = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_AUTOPLAY_DELAY_MS,
                value,
            })?;
        }
        Ok(())
    }
}
