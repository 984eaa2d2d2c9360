//! Event stream configuration

use serde::{Deserialize, Serialize};

/// Event stream client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub enabled: bool,
    /// Fixed delay between a disconnect and the next connect attempt
    pub reconnect_delay_ms: u64,
    /// Application-level keepalive interval; 0 disables pings
    pub ping_interval_seconds: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reconnect_delay_ms: 3000,
            ping_interval_seconds: 30,
        }
    }
}
