//! Configuration module for Fleetwatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FLEETWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use fleetwatch::config::ConsoleConfig;
//!
//! // Load defaults
//! let config = ConsoleConfig::default();
//! assert_eq!(config.connection.endpoint, "http://127.0.0.1:8000");
//!
//! // Parse from TOML
//! let toml = r#"
//! [connection]
//! endpoint = "http://fleet.internal:9000"
//! "#;
//! let config: ConsoleConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.connection.endpoint, "http://fleet.internal:9000");
//! ```

pub mod connection;
pub mod error;
pub mod logging;

pub use connection::ConnectionConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

// Re-export the per-component configs from their owning modules
pub use crate::poll::PollConfig;
pub use crate::stream::StreamConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Fleetwatch console.
///
/// Aggregates the backend connection, poll, event stream, and logging
/// sections.
///
/// # Example
///
/// ```rust
/// use fleetwatch::config::ConsoleConfig;
///
/// let config = ConsoleConfig::default();
/// assert_eq!(config.poll.overview_interval_seconds, 10);
/// assert_eq!(config.stream.reconnect_delay_ms, 3000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend connection settings
    pub connection: ConnectionConfig,
    /// Poll client configuration
    pub poll: PollConfig,
    /// Event stream configuration
    pub stream: StreamConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports FLEETWATCH_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("FLEETWATCH_ENDPOINT") {
            self.connection.endpoint = endpoint;
        }

        if let Ok(level) = std::env::var("FLEETWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLEETWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(poll) = std::env::var("FLEETWATCH_POLL") {
            self.poll.enabled = poll.to_lowercase() == "true";
        }
        if let Ok(stream) = std::env::var("FLEETWATCH_STREAM") {
            self.stream.enabled = stream.to_lowercase() == "true";
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.endpoint.is_empty() {
            return Err(ConfigError::Validation {
                field: "connection.endpoint".to_string(),
                message: "endpoint cannot be empty".to_string(),
            });
        }
        if let Err(e) = url::Url::parse(&self.connection.endpoint) {
            return Err(ConfigError::Validation {
                field: "connection.endpoint".to_string(),
                message: format!("not a valid URL: {}", e),
            });
        }
        if self.connection.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "connection.request_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.poll.overview_interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "poll.overview_interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if self.stream.reconnect_delay_ms == 0 {
            return Err(ConfigError::Validation {
                field: "stream.reconnect_delay_ms".to_string(),
                message: "reconnect delay must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
