//! Worker command handlers (spawn, stop, evict, stop-all)

use crate::api::ApiClient;
use crate::cli::{load_config_with_overrides, output, StopAllArgs, WorkerActionArgs};
use crate::command::CommandDispatcher;
use crate::poll::{refresh_channel, Poller};
use crate::store::SnapshotStore;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

/// The three per-worker actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerAction {
    Spawn,
    Stop,
    Evict,
}

/// Dispatch one worker action and show the refreshed service state.
pub async fn handle_worker_command(
    action: WorkerAction,
    args: &WorkerActionArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    if action == WorkerAction::Evict
        && !args.yes
        && !confirm(&format!(
            "Evict worker '{}' from service '{}'? This forcibly kills the process.",
            args.alias, args.service_id
        ))?
    {
        return Ok("Aborted.".to_string());
    }

    let config = load_config_with_overrides(&args.config, args.endpoint.as_deref())?;
    let api = Arc::new(ApiClient::new(
        &config.connection.endpoint,
        Duration::from_secs(config.connection.request_timeout_seconds),
    ));

    let store = Arc::new(SnapshotStore::new());
    let poller = Poller::new(Arc::clone(&store), Arc::clone(&api), config.poll.clone());
    let (refresh, mut refresh_rx) = refresh_channel();
    let dispatcher = CommandDispatcher::new(Arc::clone(&api), refresh);

    let response = match action {
        WorkerAction::Spawn => dispatcher.spawn(&args.service_id, &args.alias).await?,
        WorkerAction::Stop => dispatcher.stop(&args.service_id, &args.alias).await?,
        WorkerAction::Evict => dispatcher.evict(&args.service_id, &args.alias).await?,
    };

    let mut out = if response.success {
        format!("{} {}", "ok:".green().bold(), response.message)
    } else {
        format!("{} {}", "refused:".red().bold(), response.message)
    };

    // The dispatcher requested a poll refresh; honor it once so the
    // operator sees the post-command state.
    if refresh_rx.try_recv().is_ok() && poller.refresh_services().await {
        if let Some(service) = store.service(&args.service_id) {
            out.push('\n');
            out.push_str(&output::format_service_detail(&service));
        }
    }

    Ok(out)
}

/// Stop every worker under one manager.
pub async fn handle_stop_all(args: &StopAllArgs) -> Result<String, Box<dyn std::error::Error>> {
    if !args.yes
        && !confirm(&format!(
            "Stop ALL workers managed by '{}'?",
            args.manager_id
        ))?
    {
        return Ok("Aborted.".to_string());
    }

    let config = load_config_with_overrides(&args.config, args.endpoint.as_deref())?;
    let api = Arc::new(ApiClient::new(
        &config.connection.endpoint,
        Duration::from_secs(config.connection.request_timeout_seconds),
    ));

    let (refresh, _refresh_rx) = refresh_channel();
    let dispatcher = CommandDispatcher::new(Arc::clone(&api), refresh);

    let response = dispatcher.stop_all(&args.manager_id).await?;

    Ok(if response.success {
        format!("{} {}", "ok:".green().bold(), response.message)
    } else {
        format!("{} {}", "refused:".red().bold(), response.message)
    })
}

/// Ask the operator for a y/N confirmation on stdin.
fn confirm(prompt: &str) -> Result<bool, std::io::Error> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "YES"))
}
