//! One-shot query command handlers (services, service, overview)

use crate::api::ApiClient;
use crate::cli::{load_config_with_overrides, output, OverviewArgs, ServiceArgs, ServicesArgs};
use std::time::Duration;

fn client_for(
    config_path: &std::path::Path,
    endpoint: Option<&str>,
) -> Result<ApiClient, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(config_path, endpoint)?;
    Ok(ApiClient::new(
        &config.connection.endpoint,
        Duration::from_secs(config.connection.request_timeout_seconds),
    ))
}

pub async fn handle_services(args: &ServicesArgs) -> Result<String, Box<dyn std::error::Error>> {
    let api = client_for(&args.config, args.endpoint.as_deref())?;
    let response = api.list_services().await?;

    let mut services = response.services;
    services.sort_by(|a, b| a.service_id.cmp(&b.service_id));

    Ok(if args.json {
        output::format_services_json(&services)
    } else {
        output::format_services_table(&services)
    })
}

pub async fn handle_service(args: &ServiceArgs) -> Result<String, Box<dyn std::error::Error>> {
    let api = client_for(&args.config, args.endpoint.as_deref())?;
    let service = api.get_service(&args.service_id).await?;

    Ok(if args.json {
        output::format_service_json(&service)
    } else {
        output::format_service_detail(&service)
    })
}

pub async fn handle_overview(args: &OverviewArgs) -> Result<String, Box<dyn std::error::Error>> {
    let api = client_for(&args.config, args.endpoint.as_deref())?;
    let overview = api.system_overview().await?;

    Ok(if args.json {
        output::format_overview_json(&overview)
    } else {
        output::format_overview_table(&overview)
    })
}
