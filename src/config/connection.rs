//! Backend connection configuration

use serde::{Deserialize, Serialize};

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Backend HTTP endpoint; the event channel URL is derived from it
    pub endpoint: String,
    pub request_timeout_seconds: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000".to_string(),
            request_timeout_seconds: 5,
        }
    }
}
