use serde::{Deserialize, Serialize};

/// Health of a monitored service.
///
/// Determined by the backend from gateway reachability and worker state;
/// the console never derives it locally. Decoding goes through `String`
/// so an unrecognized wire value degrades to `Unknown` instead of
/// failing the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ServiceHealth {
    /// Gateway reachable and workers behaving
    Healthy,
    /// Gateway unreachable or workers failing
    Unhealthy,
    /// Not yet checked, or the backend reported a value this build does not know
    #[default]
    Unknown,
}

impl From<String> for ServiceHealth {
    fn from(value: String) -> Self {
        match value.as_str() {
            "healthy" => ServiceHealth::Healthy,
            "unhealthy" => ServiceHealth::Unhealthy,
            _ => ServiceHealth::Unknown,
        }
    }
}

/// Lifecycle state of a single worker process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WorkerState {
    /// Process is up and serving
    Running,
    /// Process is not running
    Stopped,
    /// Spawn issued, not yet serving
    Starting,
    /// Process failed
    Error,
    /// Unreported or unrecognized state
    #[default]
    Unknown,
}

impl From<String> for WorkerState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "running" => WorkerState::Running,
            "stopped" => WorkerState::Stopped,
            "starting" => WorkerState::Starting,
            "error" => WorkerState::Error,
            _ => WorkerState::Unknown,
        }
    }
}

/// Reachability of a service's gateway, independent of worker health.
///
/// `latency_ms` is reported only when the gateway answered; `error` only
/// when it did not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GatewayHealth {
    pub reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One controllable process unit within a service.
///
/// `alias` is the stable key for worker commands, unique within its
/// parent service. The resource gauges are present only when the backend
/// reports a live process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Stable command key, unique within the parent service
    pub alias: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Worker kind label (display metadata, opaque to the console)
    #[serde(rename = "type", default)]
    pub worker_type: String,
    /// Current lifecycle state
    #[serde(default)]
    pub status: WorkerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_seconds: Option<f64>,
}

/// Latest known state of one monitored service.
///
/// This is the unit of replacement in the snapshot store: every poll or
/// stream update swaps the whole record, never individual fields.
/// Display metadata defaults to empty when the backend omits it; only
/// `service_id` is required for a record to decode.
///
/// # Examples
///
/// ```
/// use fleetwatch::store::{ServiceHealth, ServiceRecord};
///
/// let record: ServiceRecord = serde_json::from_str(
///     r#"{"service_id": "ocr", "status": "healthy"}"#,
/// ).unwrap();
/// assert_eq!(record.service_id, "ocr");
/// assert_eq!(record.status, ServiceHealth::Healthy);
/// assert!(record.workers.is_empty());
///
/// // A payload without a service_id does not decode.
/// assert!(serde_json::from_str::<ServiceRecord>(r#"{"status": "healthy"}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Stable unique key
    pub service_id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Short description (display metadata)
    #[serde(default)]
    pub description: String,
    /// Icon hint (display metadata)
    #[serde(default)]
    pub icon: String,
    /// Backend-reported health rollup
    #[serde(default)]
    pub status: ServiceHealth,
    /// Gateway reachability check
    #[serde(default)]
    pub gateway: GatewayHealth,
    /// Workers in backend-reported order
    #[serde(default)]
    pub workers: Vec<WorkerRecord>,
}

impl ServiceRecord {
    /// Number of workers currently in the `Running` state.
    pub fn running_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| w.status == WorkerState::Running)
            .count()
    }
}
