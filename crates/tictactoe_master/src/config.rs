//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::store::STATS_KEY;

/// Environment variable that overrides [`AppConfig::home_url`].
pub const HOME_URL_ENV: &str = "TICTACTOE_HOME_URL";

/// Settings for the game host.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// File the stats store is kept in.
    #[serde(default = "default_stats_path")]
    stats_path: PathBuf,

    /// Key the stats record is stored under.
    #[serde(default = "default_storage_key")]
    storage_key: String,

    /// Pause before the opponent's move is shown, in milliseconds.
    #[serde(default = "default_opponent_delay_ms")]
    opponent_delay_ms: u64,

    /// Public URL of the game, embedded in shares and the manifest.
    #[serde(default = "default_home_url")]
    home_url: String,

    /// Base URL of the post composer.
    #[serde(default = "default_compose_url")]
    compose_url: String,

    /// Command used to open the composer URL (e.g. `xdg-open`).
    #[serde(default)]
    open_command: Option<String>,

    /// Command that reads clipboard text from stdin (e.g. `pbcopy`).
    #[serde(default)]
    clipboard_command: Option<String>,
}

fn default_stats_path() -> PathBuf {
    PathBuf::from("tictactoe_master.json")
}

fn default_storage_key() -> String {
    STATS_KEY.to_string()
}

fn default_opponent_delay_ms() -> u64 {
    500
}

fn default_home_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_compose_url() -> String {
    "https://warpcast.com/~/compose".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stats_path: default_stats_path(),
            storage_key: default_storage_key(),
            opponent_delay_ms: default_opponent_delay_ms(),
            home_url: default_home_url(),
            compose_url: default_compose_url(),
            open_command: None,
            clipboard_command: None,
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(stats_path = %config.stats_path.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, else defaults; then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        if let Ok(home_url) = std::env::var(HOME_URL_ENV) {
            config = config.with_home_url(home_url);
        }
        Ok(config)
    }

    /// Replaces the home URL.
    pub fn with_home_url(mut self, home_url: impl Into<String>) -> Self {
        let home_url = home_url.into();
        debug!(home_url = %home_url, "Overriding home URL");
        self.home_url = home_url;
        self
    }

    /// Opponent delay as a [`std::time::Duration`].
    pub fn opponent_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.opponent_delay_ms)
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
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
