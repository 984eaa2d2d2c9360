//! Output formatting helpers for CLI commands

use crate::store::{ServiceHealth, ServiceRecord, SystemOverview, WorkerState};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format the service collection as a table
pub fn format_services_table(services: &[ServiceRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Name", "Status", "Gateway", "Workers"]);

    for service in services {
        table.add_row(vec![
            Cell::new(&service.service_id),
            Cell::new(&service.name),
            Cell::new(health_label(service.status)),
            Cell::new(gateway_label(service)),
            Cell::new(format!(
                "{}/{} running",
                service.running_workers(),
                service.workers.len()
            )),
        ]);
    }

    table.to_string()
}

/// Format the service collection as JSON
pub fn format_services_json(services: &[ServiceRecord]) -> String {
    serde_json::to_string_pretty(&json!({
        "services": services
    }))
    .unwrap()
}

/// Format one service with its worker detail as a table
pub fn format_service_detail(service: &ServiceRecord) -> String {
    let mut out = format!(
        "{} ({})  {}  gateway: {}\n",
        service.service_id.bold(),
        service.name,
        health_label(service.status),
        gateway_label(service),
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Alias", "Name", "Type", "Status", "Port", "Memory", "Uptime", "Idle",
    ]);

    for worker in &service.workers {
        table.add_row(vec![
            Cell::new(&worker.alias),
            Cell::new(&worker.name),
            Cell::new(&worker.worker_type),
            Cell::new(worker_label(worker.status)),
            Cell::new(opt_number(worker.port.map(f64::from))),
            Cell::new(opt_gb(worker.memory_gb)),
            Cell::new(opt_duration(worker.uptime_seconds)),
            Cell::new(opt_duration(worker.idle_seconds)),
        ]);
    }

    out.push_str(&table.to_string());
    out
}

/// Format one service as JSON
pub fn format_service_json(service: &ServiceRecord) -> String {
    serde_json::to_string_pretty(service).unwrap()
}

/// Format the fleet overview as a table
pub fn format_overview_table(overview: &SystemOverview) -> String {
    let mut out = format!(
        "Services: {} ({} healthy, {} unhealthy)   Workers: {}/{} running\n",
        overview.services_count,
        overview.healthy_services.to_string().green(),
        overview.unhealthy_services.to_string().red(),
        overview.running_workers,
        overview.total_workers,
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Manager", "Reachable", "Workers", "Memory", "Error"]);

    for manager in &overview.worker_managers {
        let memory = manager
            .memory
            .as_ref()
            .map(|m| {
                format!(
                    "{:.1}/{:.1} GB ({:.0}%)",
                    m.used_gb, m.total_gb, m.used_percent
                )
            })
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&manager.service_id),
            Cell::new(if manager.reachable {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            }),
            Cell::new(manager.workers_count),
            Cell::new(memory),
            Cell::new(manager.error.as_deref().unwrap_or("-")),
        ]);
    }

    out.push_str(&table.to_string());
    out
}

/// Format the fleet overview as JSON
pub fn format_overview_json(overview: &SystemOverview) -> String {
    serde_json::to_string_pretty(overview).unwrap()
}

/// Colored label for service health
pub fn health_label(status: ServiceHealth) -> String {
    match status {
        ServiceHealth::Healthy => "Healthy".green().to_string(),
        ServiceHealth::Unhealthy => "Unhealthy".red().to_string(),
        ServiceHealth::Unknown => "Unknown".yellow().to_string(),
    }
}

/// Colored label for worker state
pub fn worker_label(status: WorkerState) -> String {
    match status {
        WorkerState::Running => "Running".green().to_string(),
        WorkerState::Stopped => "Stopped".dimmed().to_string(),
        WorkerState::Starting => "Starting".cyan().to_string(),
        WorkerState::Error => "Error".red().to_string(),
        WorkerState::Unknown => "Unknown".yellow().to_string(),
    }
}

/// Get status icon for service health
pub fn health_icon(status: ServiceHealth) -> &'static str {
    match status {
        ServiceHealth::Healthy => "✓",
        ServiceHealth::Unhealthy => "✗",
        ServiceHealth::Unknown => "?",
    }
}

fn gateway_label(service: &ServiceRecord) -> String {
    if service.gateway.reachable {
        match service.gateway.latency_ms {
            Some(latency) => format!("{:.0}ms", latency),
            None => "up".to_string(),
        }
    } else {
        match service.gateway.error.as_deref() {
            Some(error) => format!("down ({})", error),
            None => "down".to_string(),
        }
    }
}

fn opt_number(value: Option<f64>) -> String {
    value
        .map(|v| format!("{}", v as u64))
        .unwrap_or_else(|| "-".to_string())
}

fn opt_gb(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1} GB", v))
        .unwrap_or_else(|| "-".to_string())
}

fn opt_duration(value: Option<f64>) -> String {
    match value {
        Some(seconds) => {
            let total = seconds as u64;
            let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
            if hours > 0 {
                format!("{}h {}m", hours, minutes)
            } else if minutes > 0 {
                format!("{}m {}s", minutes, secs)
            } else {
                format!("{}s", secs)
            }
        }
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GatewayHealth, WorkerRecord};

    fn make_test_service() -> ServiceRecord {
        ServiceRecord {
            service_id: "ocr".to_string(),
            name: "OCR Pipeline".to_string(),
            description: "Document OCR".to_string(),
            icon: "scan".to_string(),
            status: ServiceHealth::Healthy,
            gateway: GatewayHealth {
                reachable: true,
                latency_ms: Some(12.0),
                error: None,
            },
            workers: vec![WorkerRecord {
                alias: "gpu-0".to_string(),
                name: "GPU Worker 0".to_string(),
                worker_type: "gpu".to_string(),
                status: WorkerState::Running,
                port: Some(8101),
                memory_gb: Some(3.25),
                uptime_seconds: Some(7265.0),
                idle_seconds: Some(42.0),
            }],
        }
    }

    #[test]
    fn test_format_services_table_empty() {
        let output = format_services_table(&[]);
        assert!(output.contains("Service")); // Header present
    }

    #[test]
    fn test_format_services_table_with_data() {
        let output = format_services_table(&[make_test_service()]);
        assert!(output.contains("ocr"));
        assert!(output.contains("1/1 running"));
    }

    #[test]
    fn test_format_services_json_valid() {
        let output = format_services_json(&[make_test_service()]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("services").is_some());
    }

    #[test]
    fn test_format_service_detail_lists_workers() {
        let output = format_service_detail(&make_test_service());
        assert!(output.contains("gpu-0"));
        assert!(output.contains("8101"));
        assert!(output.contains("3.2 GB"));
        assert!(output.contains("2h 1m"));
    }

    #[test]
    fn test_format_overview_table() {
        let overview: SystemOverview = serde_json::from_str(
            r#"{
                "timestamp": 0.0,
                "services_count": 2,
                "healthy_services": 1,
                "unhealthy_services": 1,
                "total_workers": 3,
                "running_workers": 2,
                "worker_managers": [
                    {"service_id": "ocr", "reachable": true, "workers_count": 2}
                ]
            }"#,
        )
        .unwrap();

        let output = format_overview_table(&overview);
        assert!(output.contains("Manager"));
        assert!(output.contains("ocr"));
        assert!(output.contains("2/3 running"));
    }

    #[test]
    fn test_health_icons() {
        assert_eq!(health_icon(ServiceHealth::Healthy), "✓");
        assert_eq!(health_icon(ServiceHealth::Unhealthy), "✗");
        assert_eq!(health_icon(ServiceHealth::Unknown), "?");
    }

    #[test]
    fn test_gateway_label_mutually_exclusive_fields() {
        let mut service = make_test_service();
        assert_eq!(gateway_label(&service), "12ms");

        service.gateway = GatewayHealth {
            reachable: false,
            latency_ms: None,
            error: Some("connect refused".to_string()),
        };
        assert_eq!(gateway_label(&service), "down (connect refused)");
    }
}
