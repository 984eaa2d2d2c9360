//! Poll client module.
//!
//! Periodically pulls full collections from the backend and writes them
//! into the snapshot store wholesale. The service list is fetched once
//! on start and again whenever a refresh is requested (typically after a
//! worker command); the fleet overview refreshes on a fixed interval.
//! Failures leave the previous snapshot state untouched and never alter
//! the schedule.

mod config;

pub use config::*;

use crate::api::ApiClient;
use crate::store::SnapshotStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Requests an immediate service-list refresh from the poller.
///
/// Requests coalesce: asking while one is already pending is a no-op,
/// and the poller's interval schedule is never disturbed.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Ask the poller to re-fetch the service list soon.
    pub fn request(&self) {
        // A full queue means a refresh is already pending; an error on a
        // closed channel means the poller is gone. Both are fine to drop.
        let _ = self.tx.try_send(());
    }
}

/// Receiving half of the refresh channel, consumed by [`Poller::start`].
pub type RefreshRequests = mpsc::Receiver<()>;

/// Create a linked refresh handle/receiver pair.
pub fn refresh_channel() -> (RefreshHandle, RefreshRequests) {
    let (tx, rx) = mpsc::channel(1);
    (RefreshHandle { tx }, rx)
}

/// Background task that keeps the snapshot store fed with polled state.
pub struct Poller {
    store: Arc<SnapshotStore>,
    api: Arc<ApiClient>,
    config: PollConfig,
}

impl Poller {
    pub fn new(store: Arc<SnapshotStore>, api: Arc<ApiClient>, config: PollConfig) -> Self {
        Self { store, api, config }
    }

    /// Fetch the service list and replace the store's service map.
    ///
    /// On failure the store is left unchanged; returns whether the
    /// refresh was applied.
    pub async fn refresh_services(&self) -> bool {
        let start = Instant::now();
        match self.api.list_services().await {
            Ok(response) => {
                metrics::histogram!("fleetwatch_poll_duration_seconds",
                    "collection" => "services"
                )
                .record(start.elapsed().as_secs_f64());

                let count = response.services.len();
                self.store.replace_all(response.services);
                tracing::debug!(services = count, "Service list refreshed");
                true
            }
            Err(e) => {
                metrics::counter!("fleetwatch_poll_failures_total",
                    "collection" => "services"
                )
                .increment(1);
                tracing::warn!(error = %e, "Service list poll failed, keeping previous state");
                false
            }
        }
    }

    /// Fetch the fleet overview and replace the store's copy.
    pub async fn refresh_overview(&self) -> bool {
        let start = Instant::now();
        match self.api.system_overview().await {
            Ok(overview) => {
                metrics::histogram!("fleetwatch_poll_duration_seconds",
                    "collection" => "overview"
                )
                .record(start.elapsed().as_secs_f64());

                self.store.set_overview(overview);
                tracing::debug!("System overview refreshed");
                true
            }
            Err(e) => {
                metrics::counter!("fleetwatch_poll_failures_total",
                    "collection" => "overview"
                )
                .increment(1);
                tracing::warn!(error = %e, "Overview poll failed, keeping previous state");
                false
            }
        }
    }

    /// Start the poll loop.
    ///
    /// Fetches the service list immediately, then refreshes the overview
    /// on the configured interval and the service list on demand.
    /// Returns a JoinHandle that resolves when the poller stops.
    pub fn start(
        self,
        mut refresh_rx: RefreshRequests,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(
                self.config.overview_interval_seconds,
            ));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                overview_interval_seconds = self.config.overview_interval_seconds,
                "Poller started"
            );

            self.refresh_services().await;

            let mut refresh_closed = false;
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Poller shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.refresh_overview().await;
                    }
                    request = refresh_rx.recv(), if !refresh_closed => {
                        match request {
                            Some(()) => {
                                tracing::debug!("On-demand service refresh requested");
                                self.refresh_services().await;
                            }
                            None => refresh_closed = true,
                        }
                    }
                }
            }
        })
    }
}
