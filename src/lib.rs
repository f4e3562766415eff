// Polar BLE Receiver - heart rate event ingestion

pub mod ble;
pub mod cache;
pub mod config;
pub mod host;
pub mod types;

pub use ble::{BleEvent, EventKind, HeartRateEventHandler, ReceiverError};
pub use cache::{LatestReadingCache, ReadingSnapshot};
pub use config::{ConfigError, ReceiverConfig};
pub use host::ReceiverHost;
pub use types::{HeartRateReading, PayloadError};
