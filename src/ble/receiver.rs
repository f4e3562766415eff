//! Heart rate event handler
//!
//! Dispatches broadcast events by kind. Lifecycle events are only logged;
//! heart rate events are decoded and published to the shared cache.

use std::sync::Arc;

use super::actions::EventKind;
use super::event::BleEvent;
use super::ReceiverError;
use crate::cache::LatestReadingCache;
use crate::config::ReceiverConfig;
use crate::types::{HeartRateReading, PayloadDecoder};

pub struct HeartRateEventHandler {
    cache: Arc<LatestReadingCache>,
    decoder: PayloadDecoder,
    action_prefix: String,
    log_unrecognized: bool,
}

impl HeartRateEventHandler {
    /// Create a handler with the default configuration.
    pub fn new(cache: Arc<LatestReadingCache>) -> Self {
        Self::with_config(cache, &ReceiverConfig::default())
    }

    pub fn with_config(cache: Arc<LatestReadingCache>, config: &ReceiverConfig) -> Self {
        log::debug!("Heart rate receiver created for cache {}", cache.name());
        Self {
            cache,
            decoder: config.decoder(),
            action_prefix: config.action_prefix.clone(),
            log_unrecognized: config.log_unrecognized,
        }
    }

    pub fn cache(&self) -> &Arc<LatestReadingCache> {
        &self.cache
    }

    /// Resolve an action string against this handler's namespace.
    pub fn resolve(&self, action: &str) -> EventKind {
        EventKind::from_action(action, &self.action_prefix)
    }

    /// Handle an event given its action string and optional payload.
    ///
    /// Returns the published reading for heart rate events and `None` for
    /// every other kind. On error the cache is left as it was.
    pub fn handle(
        &self,
        action: &str,
        payload: Option<&str>,
    ) -> Result<Option<HeartRateReading>, ReceiverError> {
        let kind = self.resolve(action);
        if kind == EventKind::Unrecognized && self.log_unrecognized {
            log::debug!("Ignoring unrecognized action {:?}", action);
        }
        self.handle_kind(kind, payload)
    }

    /// Handle an already-resolved event kind.
    pub fn handle_kind(
        &self,
        kind: EventKind,
        payload: Option<&str>,
    ) -> Result<Option<HeartRateReading>, ReceiverError> {
        if !kind.carries_payload() && payload.is_some() {
            log::debug!("Ignoring payload on {} event", kind);
        }
        match kind {
            EventKind::Connected => {
                log::info!("GATT connected");
                Ok(None)
            }
            EventKind::Disconnected => {
                log::info!("GATT disconnected");
                Ok(None)
            }
            EventKind::ServicesDiscovered => {
                log::info!("GATT services discovered");
                Ok(None)
            }
            EventKind::HeartRateDataAvailable => self.publish(payload).map(Some),
            EventKind::Unrecognized => Ok(None),
        }
    }

    /// Handle a broadcast event, taking the payload from its data extra.
    pub fn on_receive(&self, event: &BleEvent) -> Result<Option<HeartRateReading>, ReceiverError> {
        self.handle(&event.action, event.data())
    }

    fn publish(&self, payload: Option<&str>) -> Result<HeartRateReading, ReceiverError> {
        let result = payload
            .ok_or(ReceiverError::MissingPayload)
            .and_then(|data| self.decoder.decode(data).map_err(ReceiverError::from));

        let reading = match result {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("Dropping heart rate event {:?}: {}", payload, e);
                return Err(e);
            }
        };

        let snapshot = self.cache.update(reading);
        log::info!("Received {} (update {})", reading, snapshot.version);
        Ok(reading)
    }
}
