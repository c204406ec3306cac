//! Solaris Telemetry Decoder Library
//!
//! Decodes the periodic, semicolon-delimited status line a DAIKIN/ROTEX
//! Solaris RPS solar-thermal controller sends over its serial link, and
//! republishes the values as typed observations.
//!
//! # Architecture
//!
//! raw bytes → [`LineFramer`] → complete line → [`LineParser`] →
//! [`ParsedRecord`] → [`Publisher`] → host sinks
//!
//! The library is receive-only and allocation-free in steady state:
//! - Fixed-size line and conversion buffers
//! - Idle timeout recovery for truncated transmissions
//! - Malformed fields degrade to zero, malformed lines are dropped whole
//! - Boot banners are recognized and ignored
//!
//! The library does NOT:
//! - Open serial ports or read from any device
//! - Persist anything
//! - Print; all diagnostics go through the `log` facade
//!
//! # Example Usage
//!
//! ```
//! use solaris_decoder::{DecoderConfig, Field, Language, SensorSinks, SensorValue, SolarisDecoder};
//!
//! let sinks = SensorSinks::new()
//!     .with_sink(Field::CollectorTemperature, |v: SensorValue<'_>| println!("TK = {} °C", v))
//!     .with_sink(Field::ErrorCode, |v: SensorValue<'_>| println!("status: {}", v));
//!
//! let config = DecoderConfig::new().with_language(Language::De);
//! let mut decoder = SolarisDecoder::new(config, sinks).unwrap();
//!
//! // Called from the host's polling loop with the bytes read so far
//! decoder.process(b"0;1;75;0;84;58;61;63;3,2;;3500\r\n", 0);
//! ```

// Public modules
pub mod config;
pub mod decoder;
pub mod error_codes;
pub mod framer;
pub mod parser;
pub mod publisher;
pub mod sensors;
pub mod types;

// Re-export main types for convenience
pub use config::DecoderConfig;
pub use decoder::{DecoderStats, SolarisDecoder};
pub use error_codes::{ErrorCodeEntry, ErrorCodeTable, Language};
pub use framer::LineFramer;
pub use parser::LineParser;
pub use publisher::{Publisher, SensorSinks, Sink};
pub use sensors::{SensorInfo, SensorKind, SENSORS};
pub use types::{
    Banner, DecoderError, Field, ParseOutcome, ParsedRecord, RejectReason, Result, SensorValue,
    NO_ERROR, TOTAL_FIELDS,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: ensure we can create a decoder
        let decoder = SolarisDecoder::new(DecoderConfig::new(), SensorSinks::new()).unwrap();
        assert_eq!(decoder.stats().records, 0);
        assert_eq!(SENSORS.len(), TOTAL_FIELDS);
    }
}
