//! BLE event ingestion
//!
//! Recognizes the GATT lifecycle and heart rate events broadcast by the BLE
//! service, decodes heart rate payloads and publishes them to the
//! latest-reading cache.

pub mod actions;
pub mod event;
pub mod receiver;

use thiserror::Error;

use crate::types::PayloadError;

pub use actions::EventKind;
pub use event::BleEvent;
pub use receiver::HeartRateEventHandler;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiverError {
    #[error("Heart rate event carried no payload")]
    MissingPayload,

    #[error("Malformed heart rate payload: {0}")]
    MalformedPayload(#[from] PayloadError),
}
