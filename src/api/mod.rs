//! Backend API client module.
//!
//! A thin typed client over the backend's versioned REST surface. The
//! poll client uses the collection fetches; the command dispatcher uses
//! the worker action calls. Bodies are read as text and decoded
//! separately so a malformed payload is distinguishable from a transport
//! failure.

mod error;
mod types;

pub use error::*;
pub use types::*;

use crate::store::{ServiceRecord, SystemOverview};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Versioned path prefix shared by every REST endpoint.
const API_PREFIX: &str = "/api/v1";

/// Typed client for the backend REST API.
///
/// Cheap to clone indirectly via `Arc`; holds a pooled reqwest client
/// with a request timeout applied to every call.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given backend endpoint
    /// (e.g. `http://127.0.0.1:8000`).
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(endpoint, client)
    }

    /// Create a client with a custom reqwest client (for testing).
    pub fn with_client(endpoint: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The backend endpoint this client talks to, without the API prefix.
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full service collection.
    pub async fn list_services(&self) -> Result<ServiceListResponse, ApiError> {
        self.get_json("/services").await
    }

    /// Fetch one service by id.
    pub async fn get_service(&self, service_id: &str) -> Result<ServiceRecord, ApiError> {
        self.get_json(&format!("/services/{}", service_id)).await
    }

    /// Fetch the fleet-wide rollup.
    pub async fn system_overview(&self) -> Result<SystemOverview, ApiError> {
        self.get_json("/system/overview").await
    }

    /// Spawn a worker.
    pub async fn spawn_worker(
        &self,
        service_id: &str,
        alias: &str,
    ) -> Result<WorkerActionResponse, ApiError> {
        self.post_json(&format!("/services/{}/workers/{}/spawn", service_id, alias))
            .await
    }

    /// Stop a worker.
    pub async fn stop_worker(
        &self,
        service_id: &str,
        alias: &str,
    ) -> Result<WorkerActionResponse, ApiError> {
        self.post_json(&format!("/services/{}/workers/{}/stop", service_id, alias))
            .await
    }

    /// Forcibly evict a worker.
    pub async fn evict_worker(
        &self,
        service_id: &str,
        alias: &str,
    ) -> Result<WorkerActionResponse, ApiError> {
        self.post_json(&format!("/services/{}/workers/{}/evict", service_id, alias))
            .await
    }

    /// Stop every worker managed by one worker manager.
    pub async fn stop_all_workers(&self, manager_id: &str) -> Result<StopAllResponse, ApiError> {
        self.post_json(&format!("/system/worker-manager/{}/stop-all", manager_id))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url_for(path);
        let response = self.client.get(&url).send().await?;
        Self::decode(path, response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url_for(path);
        let response = self.client.post(&url).send().await?;
        Self::decode(path, response).await
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_prefix() {
        let client = ApiClient::new("http://localhost:8000", Duration::from_secs(5));
        assert_eq!(
            client.url_for("/services"),
            "http://localhost:8000/api/v1/services"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(5));
        assert_eq!(client.endpoint(), "http://localhost:8000");
        assert_eq!(
            client.url_for("/system/overview"),
            "http://localhost:8000/api/v1/system/overview"
        );
    }
}
