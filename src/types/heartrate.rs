//! types/heartrate.rs
//!
//! Defines the HeartRateReading struct and the decoder for the delimited
//! text payload a heart rate strap delivers with each data event.
//!
//! Payload tokens arrive in the order heart rate, previous RR interval,
//! RR interval, e.g. `"72;810;795"`.

use std::fmt;
use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default token separator used by the receiver.
pub const DEFAULT_DELIMITER: char = ';';

/// Position of each field in the payload.
const FIELD_ORDER: [PayloadField; 3] = [
    PayloadField::HeartRate,
    PayloadField::PreviousRrInterval,
    PayloadField::RrInterval,
];

/// One decoded heart rate sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeartRateReading {
    /// Beats per minute
    pub heart_rate: i32,

    /// Current inter-beat interval
    pub rr_interval: i32,

    /// Inter-beat interval preceding `rr_interval`
    pub previous_rr_interval: i32,
}

impl HeartRateReading {
    pub fn new(heart_rate: i32, previous_rr_interval: i32, rr_interval: i32) -> Self {
        Self {
            heart_rate,
            rr_interval,
            previous_rr_interval,
        }
    }

    /// Decode a payload using the default `;` delimiter.
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        PayloadDecoder::default().decode(payload)
    }

    /// Encode back into the wire order, joined by `delimiter`.
    pub fn to_payload(&self, delimiter: char) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.heart_rate,
            self.previous_rr_interval,
            self.rr_interval,
            d = delimiter
        )
    }
}

impl fmt::Display for HeartRateReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HR: {} RR: {} pRR: {}",
            self.heart_rate, self.rr_interval, self.previous_rr_interval
        )
    }
}

impl std::str::FromStr for HeartRateReading {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Names the payload field a token was decoded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadField {
    HeartRate,
    PreviousRrInterval,
    RrInterval,
}

impl fmt::Display for PayloadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadField::HeartRate => "heart rate",
            PayloadField::PreviousRrInterval => "previous RR interval",
            PayloadField::RrInterval => "RR interval",
        };
        f.write_str(name)
    }
}

/// Why a payload could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("missing {field} (token {position})")]
    MissingToken { field: PayloadField, position: usize },

    #[error("invalid {field} {token:?}: {source}")]
    InvalidInteger {
        field: PayloadField,
        token: String,
        source: ParseIntError,
    },

    #[error("{extra} unexpected trailing token(s)")]
    TrailingTokens { extra: usize },
}

/// Splits and decodes payload strings.
///
/// Empty tokens are skipped, so doubled or trailing delimiters are tolerated.
/// Tokens beyond the third are ignored unless `strict` is set.
#[derive(Clone, Copy, Debug)]
pub struct PayloadDecoder {
    delimiter: char,
    strict: bool,
}

impl Default for PayloadDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl PayloadDecoder {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            strict: false,
        }
    }

    /// Reject payloads carrying more than three tokens.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn decode(&self, payload: &str) -> Result<HeartRateReading, PayloadError> {
        let mut tokens = payload.split(self.delimiter).filter(|t| !t.is_empty());
        let mut values = [0i32; 3];

        for (position, field) in FIELD_ORDER.iter().enumerate() {
            let token = tokens.next().ok_or(PayloadError::MissingToken {
                field: *field,
                position,
            })?;
            values[position] = token
                .parse::<i32>()
                .map_err(|source| PayloadError::InvalidInteger {
                    field: *field,
                    token: token.to_string(),
                    source,
                })?;
        }

        let extra = tokens.count();
        if extra > 0 {
            if self.strict {
                return Err(PayloadError::TrailingTokens { extra });
            }
            log::debug!("Ignoring {} trailing token(s) in {:?}", extra, payload);
        }

        let [heart_rate, previous_rr_interval, rr_interval] = values;
        Ok(HeartRateReading::new(heart_rate, previous_rr_interval, rr_interval))
    }
}
