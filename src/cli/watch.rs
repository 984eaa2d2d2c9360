//! Watch command implementation
//!
//! Wires the full synchronization layer together: snapshot store, poll
//! client, event stream client, and a render loop that redraws the
//! console whenever the store notifies. Ctrl-C tears everything down
//! through one cancellation token.

use crate::api::ApiClient;
use crate::cli::{load_config_with_overrides, output, WatchArgs};
use crate::poll::{refresh_channel, Poller};
use crate::store::SnapshotStore;
use crate::stream::StreamClient;
use anyhow::Context;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

pub async fn run_watch(args: &WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_with_overrides(&args.config, args.endpoint.as_deref())?;
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_stream {
        config.stream.enabled = false;
    }
    if args.no_poll {
        config.poll.enabled = false;
    }

    crate::logging::init_tracing(&config.logging)?;

    let store = Arc::new(SnapshotStore::new());
    let api = Arc::new(ApiClient::new(
        &config.connection.endpoint,
        Duration::from_secs(config.connection.request_timeout_seconds),
    ));

    let cancel_token = CancellationToken::new();
    let mut tasks = Vec::new();

    let (_refresh, refresh_rx) = refresh_channel();
    if config.poll.enabled {
        let poller = Poller::new(Arc::clone(&store), Arc::clone(&api), config.poll.clone());
        tasks.push(poller.start(refresh_rx, cancel_token.clone()));
    }

    if config.stream.enabled {
        let client = StreamClient::new(
            Arc::clone(&store),
            &config.connection.endpoint,
            config.stream.clone(),
        )
        .context("failed to set up event stream client")?;
        tasks.push(client.start(cancel_token.clone()));
    }

    if tasks.is_empty() {
        return Err("nothing to run: both poll and stream are disabled".into());
    }

    tracing::info!(
        endpoint = %config.connection.endpoint,
        poll = config.poll.enabled,
        stream = config.stream.enabled,
        "Console started"
    );

    let mut updates = store.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            update = updates.recv() => match update {
                // Coalesce whatever else is already queued, then redraw
                // from the store; notifications carry no state.
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    while updates.try_recv().is_ok() {}
                    render(&store);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    cancel_token.cancel();
    for task in tasks {
        let _ = task.await;
    }

    Ok(())
}

/// Redraw the console from the current snapshot.
fn render(store: &SnapshotStore) {
    let snapshot = store.snapshot();

    let connectivity = if snapshot.stream_connected {
        "live".green().to_string()
    } else {
        "polling only".yellow().to_string()
    };
    let freshness = snapshot
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    // Clear and home, then redraw
    print!("\x1B[2J\x1B[1;1H");
    println!("fleetwatch  [{}]  updated {}", connectivity, freshness);
    println!();

    if let Some(ref overview) = snapshot.overview {
        println!("{}", output::format_overview_table(overview));
        println!();
    }

    let mut services: Vec<_> = snapshot.services.values().cloned().collect();
    services.sort_by(|a, b| a.service_id.cmp(&b.service_id));
    println!("{}", output::format_services_table(&services));
}
