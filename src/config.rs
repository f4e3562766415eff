//! Receiver configuration, loaded from JSON.
//!
//! ```json
//! { "delimiter": ",", "strict_token_count": true }
//! ```
//!
//! Omitted fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ble::actions::ACTION_NAMESPACE;
use crate::types::heartrate::{PayloadDecoder, DEFAULT_DELIMITER};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid payload delimiter {0:?}")]
    InvalidDelimiter(char),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Separator between payload tokens.
    pub delimiter: char,

    /// Namespace prepended to action names.
    pub action_prefix: String,

    /// Treat tokens after the third as malformed instead of ignoring them.
    pub strict_token_count: bool,

    /// Log unrecognized actions at debug level.
    pub log_unrecognized: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            action_prefix: ACTION_NAMESPACE.to_string(),
            strict_token_count: false,
            log_unrecognized: true,
        }
    }
}

impl ReceiverConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading receiver config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject delimiters that could be part of an integer token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = self.delimiter;
        if d.is_whitespace() || d.is_ascii_digit() || d == '+' || d == '-' {
            return Err(ConfigError::InvalidDelimiter(d));
        }
        Ok(())
    }

    pub fn decoder(&self) -> PayloadDecoder {
        PayloadDecoder::new(self.delimiter).strict(self.strict_token_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ReceiverConfig::default();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.action_prefix, ACTION_NAMESPACE);
        assert!(!config.strict_token_count);
        assert!(config.log_unrecognized);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ReceiverConfig::from_json_str(r#"{"strict_token_count": true}"#).unwrap();
        assert!(config.strict_token_count);
        assert_eq!(config.delimiter, ';');

        let config = ReceiverConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ReceiverConfig::default());
    }

    #[test]
    fn test_rejects_numeric_delimiters() {
        for bad in ['7', '-', '+', ' ', '\t'] {
            let json = serde_json::json!({ "delimiter": bad }).to_string();
            match ReceiverConfig::from_json_str(&json) {
                Err(ConfigError::InvalidDelimiter(c)) => assert_eq!(c, bad),
                other => panic!("expected InvalidDelimiter for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ReceiverConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"delimiter": ",", "action_prefix": "org.example."}}"#).unwrap();

        let config = ReceiverConfig::load(file.path()).unwrap();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.action_prefix, "org.example.");

        let reading = config.decoder().decode("60,1000,990").unwrap();
        assert_eq!(reading.rr_interval, 990);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReceiverConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
