//! cache.rs
//!
//! The latest-reading cache. Holds at most one `HeartRateReading`, replaced
//! wholesale on every successful update, and fans updates out to subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::types::HeartRateReading;

/// A cached reading together with the bookkeeping of the write that stored it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSnapshot {
    pub reading: HeartRateReading,
    /// Number of successful updates so far, starting at 1.
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

type Callback = Arc<dyn Fn(&HeartRateReading) + Send + Sync>;

/// Process-lifetime store of the most recent heart rate reading.
///
/// Writes replace the whole snapshot under a single lock, so a reader sees
/// either the previous reading or the new one, never a mix.
pub struct LatestReadingCache {
    id: Uuid,
    name: String,
    current: RwLock<Option<ReadingSnapshot>>,
    subscribers: Mutex<HashMap<Uuid, Callback>>,
    update_tx: broadcast::Sender<HeartRateReading>,
}

impl Default for LatestReadingCache {
    fn default() -> Self {
        Self::new("heart_rate")
    }
}

impl LatestReadingCache {
    /// Create an empty cache
    pub fn new(name: &str) -> Self {
        let (update_tx, _) = broadcast::channel(32);
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            current: RwLock::new(None),
            subscribers: Mutex::new(HashMap::new()),
            update_tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current reading, if any has been stored
    pub fn latest(&self) -> Option<HeartRateReading> {
        self.snapshot().map(|s| s.reading)
    }

    /// Get the current reading with its version and update time
    pub fn snapshot(&self) -> Option<ReadingSnapshot> {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of successful updates so far
    pub fn version(&self) -> u64 {
        self.snapshot().map_or(0, |s| s.version)
    }

    /// Replace the cached reading and notify subscribers
    ///
    /// The broadcast goes out while the write lock is held, so watchers see
    /// readings in version order. Callbacks run after both locks are released
    /// and may subscribe or unsubscribe.
    pub fn update(&self, reading: HeartRateReading) -> ReadingSnapshot {
        let snapshot = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let version = guard.as_ref().map_or(0, |s| s.version) + 1;
            let snapshot = ReadingSnapshot {
                reading,
                version,
                updated_at: Utc::now(),
            };
            *guard = Some(snapshot);

            // No receivers is fine.
            let _ = self.update_tx.send(reading);
            snapshot
        };

        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(&reading);
        }

        snapshot
    }

    /// Receive every reading stored after this call
    pub fn watch(&self) -> broadcast::Receiver<HeartRateReading> {
        self.update_tx.subscribe()
    }

    /// Register a callback run after each update. Returns its subscription id.
    pub fn subscribe(&self, callback: Box<dyn Fn(&HeartRateReading) + Send + Sync>) -> Uuid {
        let id = Uuid::new_v4();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::from(callback));
        id
    }

    /// Remove a callback. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }
}

impl std::fmt::Debug for LatestReadingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestReadingCache")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("current", &self.snapshot())
            .finish()
    }
}
