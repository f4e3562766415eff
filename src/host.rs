//! Wiring for the receiver: owns the cache and creates the handler once.

use std::sync::{Arc, OnceLock};

use crate::ble::HeartRateEventHandler;
use crate::cache::LatestReadingCache;
use crate::config::ReceiverConfig;
use crate::types::HeartRateReading;

/// Owns the latest-reading cache and lazily builds the single handler that
/// writes to it.
pub struct ReceiverHost {
    config: ReceiverConfig,
    cache: Arc<LatestReadingCache>,
    receiver: OnceLock<Arc<HeartRateEventHandler>>,
}

impl Default for ReceiverHost {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}

impl ReceiverHost {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            config,
            cache: Arc::new(LatestReadingCache::default()),
            receiver: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    /// The handler, created on first use. Later calls return the same instance.
    pub fn receiver(&self) -> Arc<HeartRateEventHandler> {
        let receiver = self.receiver.get_or_init(|| {
            log::info!("Creating heart rate receiver");
            Arc::new(HeartRateEventHandler::with_config(
                Arc::clone(&self.cache),
                &self.config,
            ))
        });
        Arc::clone(receiver)
    }

    pub fn is_receiver_created(&self) -> bool {
        self.receiver.get().is_some()
    }

    pub fn cache(&self) -> &Arc<LatestReadingCache> {
        &self.cache
    }

    /// Current reading, if one has been received.
    pub fn latest(&self) -> Option<HeartRateReading> {
        self.cache.latest()
    }
}
