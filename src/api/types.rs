//! Response envelopes for the backend REST surface.

use crate::store::ServiceRecord;
use serde::{Deserialize, Serialize};

/// Response of `GET /services`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceRecord>,
    /// Backend-side generation time (seconds since the epoch)
    #[serde(default)]
    pub timestamp: f64,
}

/// Response of the per-worker action endpoints (spawn/stop/evict).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerActionResponse {
    pub success: bool,
    pub message: String,
    pub worker_alias: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Response of `POST /system/worker-manager/{id}/stop-all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopAllResponse {
    pub success: bool,
    pub message: String,
}
