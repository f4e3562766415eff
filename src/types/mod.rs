pub mod heartrate;

pub use heartrate::{HeartRateReading, PayloadDecoder, PayloadError, PayloadField};
