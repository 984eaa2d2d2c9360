//! Event stream client module.
//!
//! Maintains the persistent WebSocket to the backend and feeds
//! incremental per-service updates into the snapshot store. The
//! connection lives in a single owned task driving an explicit state
//! machine: DISCONNECTED → CONNECTING → CONNECTED, falling back to
//! DISCONNECTED on any close or transport error, then reconnecting
//! after a fixed delay, forever, until cancelled.

mod config;
mod events;

pub use config::*;
pub use events::*;

use crate::store::SnapshotStore;
use futures_util::{SinkExt, StreamExt};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Errors raised while setting up the stream client.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("invalid endpoint url '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("endpoint '{endpoint}' has no websocket-mappable scheme")]
    UnsupportedScheme { endpoint: String },
}

/// Connection lifecycle of the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Read-only view of the client's connection state.
#[derive(Debug, Clone)]
pub struct ConnectionStateHandle {
    state: Arc<RwLock<ConnectionState>>,
}

impl ConnectionStateHandle {
    pub fn current(&self) -> ConnectionState {
        *self.state.read().expect("connection state lock poisoned")
    }
}

/// Derive the event channel URL from the backend HTTP endpoint.
///
/// The scheme mirrors the endpoint's transport security: `https` maps
/// to `wss`, anything else to `ws`. The channel always lives at `/ws`.
pub fn websocket_url(endpoint: &str) -> Result<String, StreamError> {
    let mut url = url::Url::parse(endpoint).map_err(|source| StreamError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    url.set_scheme(scheme)
        .map_err(|_| StreamError::UnsupportedScheme {
            endpoint: endpoint.to_string(),
        })?;
    url.set_path("/ws");

    Ok(url.to_string())
}

/// The event stream client.
///
/// Owns the socket, the reconnect schedule, and the keepalive timer;
/// reflects connectivity into the store's `stream_connected` flag. Per
/// spec, reconnects are fixed-delay and unlimited; a fleet console
/// must outlive any backend restart.
pub struct StreamClient {
    store: Arc<SnapshotStore>,
    config: StreamConfig,
    url: String,
    state: Arc<RwLock<ConnectionState>>,
}

impl StreamClient {
    /// Create a client for the given backend HTTP endpoint.
    pub fn new(
        store: Arc<SnapshotStore>,
        endpoint: &str,
        config: StreamConfig,
    ) -> Result<Self, StreamError> {
        let url = websocket_url(endpoint)?;
        Ok(Self {
            store,
            config,
            url,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
        })
    }

    /// The derived channel URL this client connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Handle for observing the connection state machine.
    pub fn state_handle(&self) -> ConnectionStateHandle {
        ConnectionStateHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Start the connection loop.
    ///
    /// Returns a JoinHandle that resolves once the client has fully shut
    /// down. Cancelling the token closes an open channel and aborts any
    /// pending reconnect; no further attempts follow.
    pub fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel_token).await })
    }

    async fn run(self, cancel_token: CancellationToken) {
        let reconnect_delay = Duration::from_millis(self.config.reconnect_delay_ms);
        let mut attempt: u32 = 0;

        tracing::info!(url = %self.url, "Event stream client started");

        loop {
            if cancel_token.is_cancelled() {
                break;
            }

            attempt += 1;
            self.set_state(ConnectionState::Connecting);
            tracing::debug!(attempt, url = %self.url, "Connecting to event stream");

            let connect = tokio::select! {
                _ = cancel_token.cancelled() => break,
                result = connect_async(self.url.as_str()) => result,
            };

            match connect {
                Ok((ws, _response)) => {
                    attempt = 0;
                    self.connected(ws, &cancel_token).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, "Event stream connect failed");
                }
            }

            self.set_state(ConnectionState::Disconnected);

            if cancel_token.is_cancelled() {
                break;
            }

            metrics::counter!("fleetwatch_stream_reconnects_total").increment(1);
            // Fixed-delay reconnect; cancellation aborts the pending
            // attempt rather than letting it dangle past teardown.
            tokio::select! {
                _ = cancel_token.cancelled() => break,
                _ = tokio::time::sleep(reconnect_delay) => {}
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::info!("Event stream client shut down");
    }

    /// Drive one established connection until it closes, errors, or the
    /// client is cancelled.
    async fn connected(&self, mut ws: WsStream, cancel_token: &CancellationToken) {
        let handshake = ClientMessage::subscribe_all().to_json();
        if ws.send(Message::Text(handshake)).await.is_err() {
            tracing::warn!("Failed to send subscribe handshake");
            let _ = ws.close(None).await;
            return;
        }

        self.set_state(ConnectionState::Connected);
        self.store.set_connected(true);
        tracing::info!("Event stream connected");

        let ping_enabled = self.config.ping_interval_seconds > 0;
        let mut ping = tokio::time::interval(Duration::from_secs(
            self.config.ping_interval_seconds.max(1),
        ));
        ping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; the handshake already
        // proved the channel writable, so swallow it.
        ping.tick().await;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    let _ = ws.close(None).await;
                    break;
                }
                _ = ping.tick(), if ping_enabled => {
                    if ws.send(Message::Text(ClientMessage::Ping.to_json())).await.is_err() {
                        tracing::warn!("Keepalive ping failed");
                        break;
                    }
                }
                message = ws.next() => match message {
                    Some(Ok(Message::Text(text))) => self.handle_text(&text),
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = ws.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Event stream closed by backend");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Event stream transport error");
                        break;
                    }
                    None => break,
                }
            }
        }

        self.store.set_connected(false);
    }

    /// Apply one inbound text frame to the store.
    ///
    /// Decode failures are logged and dropped; they never affect the
    /// connection or the store.
    fn handle_text(&self, text: &str) {
        match decode_event(text) {
            Ok(StreamEvent::ServiceUpdate(record)) => {
                metrics::counter!("fleetwatch_stream_events_total",
                    "kind" => "services_update"
                )
                .increment(1);
                tracing::debug!(service_id = %record.service_id, "Applying service update");
                self.store.upsert_one(record);
            }
            Ok(StreamEvent::Pong) => {
                tracing::trace!("Keepalive pong received");
            }
            Ok(StreamEvent::Ignored { kind }) => {
                metrics::counter!("fleetwatch_stream_events_total", "kind" => "ignored")
                    .increment(1);
                tracing::trace!(kind = %kind, "Ignoring unrecognized event type");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable stream message");
            }
        }
    }

    fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.write().expect("connection state lock poisoned");
        if *state != next {
            tracing::debug!(state = ?next, "Event stream state changed");
            *state = next;
        }
    }
}
