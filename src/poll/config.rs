//! Poll configuration

use serde::{Deserialize, Serialize};

/// Poll client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub enabled: bool,
    /// Fixed interval between overview refreshes
    pub overview_interval_seconds: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            overview_interval_seconds: 10,
        }
    }
}
