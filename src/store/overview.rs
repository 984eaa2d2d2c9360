use serde::{Deserialize, Serialize};

/// Memory gauge for one worker-manager host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total_gb: f64,
    pub available_gb: f64,
    pub used_gb: f64,
    pub used_percent: f64,
}

/// Reachability and capacity of one per-service worker manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerManagerRecord {
    /// Service this manager belongs to
    pub service_id: String,
    pub reachable: bool,
    #[serde(default)]
    pub workers_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fleet-wide rollup, fetched independently of the service list.
///
/// The backend computes these counts itself, so they can transiently
/// disagree with the service map held in the snapshot store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemOverview {
    /// Backend-side generation time (seconds since the epoch)
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub services_count: u32,
    #[serde(default)]
    pub healthy_services: u32,
    #[serde(default)]
    pub unhealthy_services: u32,
    #[serde(default)]
    pub total_workers: u32,
    #[serde(default)]
    pub running_workers: u32,
    /// Managers in backend-reported order
    #[serde(default)]
    pub worker_managers: Vec<WorkerManagerRecord>,
}
