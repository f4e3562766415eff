//! Event action identifiers exchanged with the BLE service
//!
//! The BLE service broadcasts events tagged with fully-qualified action
//! strings (`<namespace><ACTION_NAME>`). These constants are exported so the
//! transport layer can route matching events to the receiver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace prefix shared by every action and extra key.
pub const ACTION_NAMESPACE: &str = "edu.ucsd.healthware.fw.device.ble.";

pub const ACTION_GATT_CONNECTED: &str = "edu.ucsd.healthware.fw.device.ble.ACTION_GATT_CONNECTED";
pub const ACTION_GATT_DISCONNECTED: &str =
    "edu.ucsd.healthware.fw.device.ble.ACTION_GATT_DISCONNECTED";
pub const ACTION_GATT_SERVICES_DISCOVERED: &str =
    "edu.ucsd.healthware.fw.device.ble.ACTION_GATT_SERVICES_DISCOVERED";
pub const ACTION_HR_DATA_AVAILABLE: &str =
    "edu.ucsd.healthware.fw.device.ble.ACTION_HR_DATA_AVAILABLE";

/// Generic data action. Carries no heart rate semantics and is not handled.
pub const ACTION_DATA_AVAILABLE: &str = "edu.ucsd.healthware.fw.device.ble.ACTION_DATA_AVAILABLE";

/// Remote clicker command. Routed elsewhere; the receiver ignores it.
pub const CLICKER_CMD: &str = "edu.ucsd.healthware.fw.device.ble.CLICKER_CMD";

/// Request to upload collected data. Routed elsewhere; the receiver ignores it.
pub const UPLOAD_TO_GOOGLE_DOC: &str = "edu.ucsd.healthware.fw.device.ble.UPLOAD_TO_GOOGLE_DOC";

/// Extra key under which the heart rate payload string travels.
pub const EXTRA_DATA: &str = "edu.ucsd.healthware.fw.device.ble.EXTRA_DATA";

/// Recognized event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// GATT link established.
    Connected,
    /// GATT link lost.
    Disconnected,
    /// Remote services enumerated.
    ServicesDiscovered,
    /// A heart rate payload is attached.
    HeartRateDataAvailable,
    /// Anything else; ignored.
    Unrecognized,
}

impl EventKind {
    /// The four kinds with handler behaviour.
    pub const RECOGNIZED: [EventKind; 4] = [
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::ServicesDiscovered,
        EventKind::HeartRateDataAvailable,
    ];

    /// Unqualified action name, or `None` for `Unrecognized`.
    pub fn action_name(&self) -> Option<&'static str> {
        match self {
            EventKind::Connected => Some("ACTION_GATT_CONNECTED"),
            EventKind::Disconnected => Some("ACTION_GATT_DISCONNECTED"),
            EventKind::ServicesDiscovered => Some("ACTION_GATT_SERVICES_DISCOVERED"),
            EventKind::HeartRateDataAvailable => Some("ACTION_HR_DATA_AVAILABLE"),
            EventKind::Unrecognized => None,
        }
    }

    /// Fully-qualified action string under `namespace`.
    pub fn action(&self, namespace: &str) -> Option<String> {
        self.action_name().map(|name| format!("{namespace}{name}"))
    }

    /// Resolve an action string. Only exact `<namespace><NAME>` matches count.
    pub fn from_action(action: &str, namespace: &str) -> EventKind {
        action
            .strip_prefix(namespace)
            .and_then(|name| {
                Self::RECOGNIZED
                    .into_iter()
                    .find(|kind| kind.action_name() == Some(name))
            })
            .unwrap_or(EventKind::Unrecognized)
    }

    /// Whether the kind's payload is decoded. Payloads on other kinds are ignored.
    pub fn carries_payload(&self) -> bool {
        matches!(self, EventKind::HeartRateDataAvailable)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name().unwrap_or("UNRECOGNIZED"))
    }
}
