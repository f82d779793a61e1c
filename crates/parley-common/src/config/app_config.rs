//! Application configuration structs
//!
//! Loads configuration from environment variables (with `.env` support).
//! Every setting has a default; a variable that is present but
//! unparsable is an error rather than a silent fallback.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub presence: PresenceSettings,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(format!("unknown environment: {s}")),
        }
    }
}

/// Presence and typing tuning
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceSettings {
    /// Idle window after the last keystroke before typing clears
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    /// Buffer size for sync-event broadcast channels
    #[serde(default = "default_sync_buffer")]
    pub sync_buffer: usize,
    /// Buffer size for plain-event broadcast channels
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl PresenceSettings {
    /// Idle timeout as a [`Duration`]
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            idle_timeout_ms: default_idle_timeout_ms(),
            sync_buffer: default_sync_buffer(),
            event_buffer: default_event_buffer(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "parley".to_string()
}

fn default_idle_timeout_ms() -> u64 {
    2000
}

fn default_sync_buffer() -> usize {
    64
}

fn default_event_buffer() -> usize {
    1024
}

/// Read and parse an optional environment variable
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: parse_var::<Environment>("APP_ENV")?.unwrap_or_default(),
            },
            presence: PresenceSettings {
                idle_timeout_ms: parse_var("TYPING_IDLE_TIMEOUT_MS")?
                    .unwrap_or_else(default_idle_timeout_ms),
                sync_buffer: parse_var("PRESENCE_SYNC_BUFFER")?
                    .unwrap_or_else(default_sync_buffer),
                event_buffer: parse_var("PRESENCE_EVENT_BUFFER")?
                    .unwrap_or_else(default_event_buffer),
            },
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            presence: PresenceSettings::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
