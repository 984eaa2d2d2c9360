//! Snapshot store module.
//!
//! Holds the latest known fleet state in memory and notifies observers
//! after every mutation. Two independent producers write here: the poll
//! client (wholesale replacement) and the event stream client (per-key
//! upserts), with last-write-wins semantics per service id. The store
//! itself performs no I/O.

mod overview;
mod service;


pub use overview::*;
pub use service::*;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;

/// Capacity of the update notification channel. Lagging observers drop
/// notifications, never state: they re-read the store on the next one.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Notification emitted after each store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUpdate {
    /// The whole service map was swapped by a poll
    ServicesReplaced { count: usize },
    /// A single service was inserted or overwritten by a stream event
    ServiceUpserted { service_id: String },
    /// The fleet-wide rollup was refreshed
    OverviewUpdated,
    /// The event stream connectivity flag flipped
    ConnectionChanged { connected: bool },
}

/// The observer-visible aggregate state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// service id → latest known record, last-write-wins per key
    pub services: HashMap<String, ServiceRecord>,
    /// Last fetched fleet rollup, if any
    pub overview: Option<SystemOverview>,
    /// Whether the event stream is currently connected
    pub stream_connected: bool,
    /// Time of the most recent data mutation from any source
    pub last_update: Option<DateTime<Utc>>,
}

/// The snapshot store: shared, mutation-notifying fleet state.
///
/// Each mutation takes the write lock once, so readers never observe a
/// partially-applied update. Observers subscribe to a broadcast channel
/// and are notified after the lock is released; back-to-back mutations
/// may be observed as one effective state, so consumers re-read rather
/// than replay.
///
/// # Examples
///
/// ```
/// use fleetwatch::store::{ServiceRecord, SnapshotStore};
///
/// let store = SnapshotStore::new();
/// let record: ServiceRecord =
///     serde_json::from_str(r#"{"service_id": "ocr", "status": "healthy"}"#).unwrap();
///
/// store.upsert_one(record);
/// assert_eq!(store.service_count(), 1);
/// assert!(store.service("ocr").is_some());
/// ```
pub struct SnapshotStore {
    inner: RwLock<Snapshot>,
    updates: broadcast::Sender<StoreUpdate>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(Snapshot::default()),
            updates,
        }
    }

    /// Subscribe to mutation notifications.
    ///
    /// Only notifications sent after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.updates.subscribe()
    }

    /// Atomically swap the entire service map for a fresh one built from
    /// `services`.
    ///
    /// The last entry wins on duplicate ids within the input. Records
    /// with an empty `service_id` would corrupt the key contract and are
    /// skipped with a warning. Services absent from the input are
    /// dropped; a full poll is authoritative for the whole collection.
    pub fn replace_all(&self, services: Vec<ServiceRecord>) {
        let mut map = HashMap::with_capacity(services.len());
        for record in services {
            if record.service_id.is_empty() {
                tracing::warn!("discarding service record with empty service_id");
                continue;
            }
            map.insert(record.service_id.clone(), record);
        }

        let count = map.len();
        {
            let mut inner = self.inner.write().expect("snapshot lock poisoned");
            inner.services = map;
            inner.last_update = Self::bump(inner.last_update);
        }
        self.notify(StoreUpdate::ServicesReplaced { count });
    }

    /// Atomically insert or overwrite exactly one service by id.
    ///
    /// The record replaces any existing entry wholesale; stale fields
    /// are never merged with fresh ones.
    pub fn upsert_one(&self, service: ServiceRecord) {
        if service.service_id.is_empty() {
            tracing::warn!("discarding service update with empty service_id");
            return;
        }

        let service_id = service.service_id.clone();
        {
            let mut inner = self.inner.write().expect("snapshot lock poisoned");
            inner.services.insert(service_id.clone(), service);
            inner.last_update = Self::bump(inner.last_update);
        }
        self.notify(StoreUpdate::ServiceUpserted { service_id });
    }

    /// Replace the fleet-wide rollup.
    pub fn set_overview(&self, overview: SystemOverview) {
        {
            let mut inner = self.inner.write().expect("snapshot lock poisoned");
            inner.overview = Some(overview);
            inner.last_update = Self::bump(inner.last_update);
        }
        self.notify(StoreUpdate::OverviewUpdated);
    }

    /// Flip the event stream connectivity flag.
    ///
    /// Connectivity is metadata, not data: `last_update` is untouched.
    pub fn set_connected(&self, connected: bool) {
        {
            let mut inner = self.inner.write().expect("snapshot lock poisoned");
            inner.stream_connected = connected;
        }
        self.notify(StoreUpdate::ConnectionChanged { connected });
    }

    /// Cloned copy of the full snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().expect("snapshot lock poisoned").clone()
    }

    /// Cloned copy of one service record.
    pub fn service(&self, service_id: &str) -> Option<ServiceRecord> {
        self.inner
            .read()
            .expect("snapshot lock poisoned")
            .services
            .get(service_id)
            .cloned()
    }

    /// Number of services currently known.
    pub fn service_count(&self) -> usize {
        self.inner
            .read()
            .expect("snapshot lock poisoned")
            .services
            .len()
    }

    /// Whether the event stream is currently connected.
    pub fn is_connected(&self) -> bool {
        self.inner
            .read()
            .expect("snapshot lock poisoned")
            .stream_connected
    }

    /// Time of the most recent data mutation, if any.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.inner.read().expect("snapshot lock poisoned").last_update
    }

    /// Monotonically non-decreasing freshness timestamp; a wall clock
    /// stepping backwards must not move `last_update` backwards.
    fn bump(previous: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        let now = Utc::now();
        match previous {
            Some(prev) if prev > now => Some(prev),
            _ => Some(now),
        }
    }

    fn notify(&self, update: StoreUpdate) {
        // Ignore error if no observers are listening
        let _ = self.updates.send(update);
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
