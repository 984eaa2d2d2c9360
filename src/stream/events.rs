//! Wire messages for the event channel.
//!
//! Inbound frames carry a `{type, timestamp, data}` envelope; only
//! `services_update` reaches the snapshot store. Decoding is a typed
//! step returning a tagged result so a malformed frame can be discarded
//! without touching the connection or the store.

use crate::store::ServiceRecord;
use serde::{Deserialize, Serialize};

/// Envelope type carrying a full service record.
const SERVICES_UPDATE: &str = "services_update";
/// Backend reply to an application-level ping.
const PONG: &str = "pong";

/// Messages this client sends to the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Subscription handshake sent right after the channel opens
    Subscribe { channel: String },
    /// Application-level keepalive
    Ping,
}

impl ClientMessage {
    /// The handshake used on every connect: subscribe to all channels.
    pub fn subscribe_all() -> Self {
        ClientMessage::Subscribe {
            channel: "all".to_string(),
        }
    }

    /// Wire form of the message.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("client message serializes")
    }
}

/// Inbound message envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    /// Backend-side emit time (seconds since the epoch)
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A decoded inbound message.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// `services_update`: replace one service record
    ServiceUpdate(ServiceRecord),
    /// Keepalive reply, consumed silently
    Pong,
    /// Recognizable envelope of a type this build does not consume
    Ignored { kind: String },
}

/// Why an inbound frame was discarded.
#[derive(Debug, thiserror::Error)]
pub enum EventDecodeError {
    #[error("message is not a valid event envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("invalid {kind} payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one inbound text frame.
///
/// Unrecognized envelope types decode to [`StreamEvent::Ignored`] so new
/// backend message kinds never break an old console. A
/// `services_update` whose payload lacks a `service_id` fails here and
/// never reaches the store.
pub fn decode_event(text: &str) -> Result<StreamEvent, EventDecodeError> {
    let envelope: Envelope = serde_json::from_str(text).map_err(EventDecodeError::Envelope)?;

    match envelope.kind.as_str() {
        SERVICES_UPDATE => {
            let record = serde_json::from_value(envelope.data).map_err(|source| {
                EventDecodeError::Payload {
                    kind: SERVICES_UPDATE.to_string(),
                    source,
                }
            })?;
            Ok(StreamEvent::ServiceUpdate(record))
        }
        PONG => Ok(StreamEvent::Pong),
        _ => Ok(StreamEvent::Ignored {
            kind: envelope.kind,
        }),
    }
}
