//! Inbound event as delivered by the BLE service broadcast.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::actions::EXTRA_DATA;

/// A broadcast event: an action string plus string extras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BleEvent {
    pub action: String,
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

impl BleEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: HashMap::new(),
        }
    }

    /// Attach the heart rate payload under `EXTRA_DATA`.
    pub fn with_data(self, data: impl Into<String>) -> Self {
        self.with_extra(EXTRA_DATA, data)
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// The payload carried under `EXTRA_DATA`, if any.
    pub fn data(&self) -> Option<&str> {
        self.extra(EXTRA_DATA)
    }
}
