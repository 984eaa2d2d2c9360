//! Command dispatcher module.
//!
//! Issues imperative worker actions against the backend. Commands are
//! fire-and-confirm: the dispatcher never mutates the snapshot store;
//! after a successful call it asks the poller for a service-list refresh
//! and lets polled state catch up. Failures propagate to the caller and
//! skip the refresh.

use crate::api::{ApiClient, ApiError, StopAllResponse, WorkerActionResponse};
use crate::poll::RefreshHandle;
use std::sync::Arc;

/// Dispatches worker lifecycle commands.
pub struct CommandDispatcher {
    api: Arc<ApiClient>,
    refresh: RefreshHandle,
}

impl CommandDispatcher {
    pub fn new(api: Arc<ApiClient>, refresh: RefreshHandle) -> Self {
        Self { api, refresh }
    }

    /// Spawn a worker, then request a poll refresh.
    pub async fn spawn(
        &self,
        service_id: &str,
        alias: &str,
    ) -> Result<WorkerActionResponse, ApiError> {
        let response = self.api.spawn_worker(service_id, alias).await?;
        self.confirm(service_id, alias, &response);
        Ok(response)
    }

    /// Stop a worker, then request a poll refresh.
    pub async fn stop(
        &self,
        service_id: &str,
        alias: &str,
    ) -> Result<WorkerActionResponse, ApiError> {
        let response = self.api.stop_worker(service_id, alias).await?;
        self.confirm(service_id, alias, &response);
        Ok(response)
    }

    /// Forcibly evict a worker, then request a poll refresh.
    ///
    /// Eviction is destructive; interactive callers are expected to
    /// confirm with the operator before dispatching.
    pub async fn evict(
        &self,
        service_id: &str,
        alias: &str,
    ) -> Result<WorkerActionResponse, ApiError> {
        let response = self.api.evict_worker(service_id, alias).await?;
        self.confirm(service_id, alias, &response);
        Ok(response)
    }

    /// Stop every worker under one manager, then request a poll refresh.
    pub async fn stop_all(&self, manager_id: &str) -> Result<StopAllResponse, ApiError> {
        let response = self.api.stop_all_workers(manager_id).await?;
        if response.success {
            tracing::info!(manager_id = %manager_id, "Stop-all dispatched");
        } else {
            tracing::warn!(manager_id = %manager_id, message = %response.message, "Stop-all refused by backend");
        }
        self.refresh.request();
        Ok(response)
    }

    fn confirm(&self, service_id: &str, alias: &str, response: &WorkerActionResponse) {
        if response.success {
            tracing::info!(
                service_id = %service_id,
                alias = %alias,
                action = %response.action,
                "Worker command dispatched"
            );
        } else {
            tracing::warn!(
                service_id = %service_id,
                alias = %alias,
                action = %response.action,
                message = %response.message,
                "Worker command refused by backend"
            );
        }
        // Polled state is authoritative either way; the backend answered,
        // so let the next fetch reflect whatever it decided.
        self.refresh.request();
    }
}
