//! Shared test utilities for Fleetwatch integration tests.
//!
//! Provides reusable builders for wire-shaped JSON bodies and a small
//! condition-polling helper, to reduce duplication across test files.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;

/// Default reconnect delay used by stream tests; short enough to observe
/// several attempts without slowing the suite down.
pub const TEST_RECONNECT_DELAY_MS: u64 = 100;

/// Wire-shaped body for one service record.
pub fn service_body(service_id: &str, status: &str) -> Value {
    json!({
        "service_id": service_id,
        "name": format!("{} service", service_id),
        "description": "",
        "icon": "server",
        "status": status,
        "gateway": if status == "healthy" {
            json!({"reachable": true, "latency_ms": 10.0})
        } else {
            json!({"reachable": false, "error": "connect refused"})
        },
        "workers": []
    })
}

/// Wire-shaped body for one worker record.
pub fn worker_body(alias: &str, status: &str) -> Value {
    json!({
        "alias": alias,
        "name": format!("Worker {}", alias),
        "type": "gpu",
        "status": status,
        "port": if status == "running" { json!(8101) } else { Value::Null },
    })
}

/// Response body of `GET /api/v1/services`.
pub fn services_response(services: Vec<Value>) -> Value {
    json!({
        "services": services,
        "timestamp": 1723100000.0
    })
}

/// Response body of `GET /api/v1/system/overview`.
pub fn overview_response(healthy: u32, unhealthy: u32) -> Value {
    json!({
        "timestamp": 1723100000.0,
        "services_count": healthy + unhealthy,
        "healthy_services": healthy,
        "unhealthy_services": unhealthy,
        "total_workers": 4,
        "running_workers": 3,
        "worker_managers": [
            {"service_id": "ocr", "reachable": true, "workers_count": 2,
             "memory": {"total_gb": 64.0, "available_gb": 32.0, "used_gb": 32.0, "used_percent": 50.0}}
        ]
    })
}

/// Response body of the worker action endpoints.
pub fn action_response(alias: &str, action: &str, success: bool) -> Value {
    json!({
        "success": success,
        "message": if success {
            format!("Worker '{}' {} successfully", alias, action)
        } else {
            format!("Failed to {} worker '{}'", action, alias)
        },
        "worker_alias": alias,
        "action": action
    })
}

/// Envelope for a `services_update` stream event.
pub fn services_update_event(data: Value) -> String {
    json!({
        "type": "services_update",
        "timestamp": 1723100000.0,
        "data": data
    })
    .to_string()
}

/// Poll `condition` every 10 ms until it holds or `timeout` elapses.
pub async fn wait_for<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
