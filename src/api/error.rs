/// Errors surfaced by backend API calls.
///
/// Transport and status failures are retried by the poll loop and
/// propagated to command callers; decode failures mean the backend
/// answered with a shape this build does not understand.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Whether the failure was a transport-level one (connection,
    /// timeout, abort) as opposed to a backend-reported error.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
