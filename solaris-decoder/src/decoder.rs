//! Main decoder API
//!
//! [`SolarisDecoder`] ties the framer, parser and publisher together. The host
//! calls [`SolarisDecoder::process`] from its polling loop with whatever bytes
//! the link has available and the current monotonic time in milliseconds.

use crate::config::DecoderConfig;
use crate::framer::LineFramer;
use crate::parser::LineParser;
use crate::publisher::{Publisher, SensorSinks};
use crate::types::{ParseOutcome, Result};

/// Counters describing what the decoder has seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Complete, non-empty lines received
    pub lines: u64,
    /// Records parsed and published
    pub records: u64,
    /// Boot banner lines ignored
    pub banners: u64,
    /// Lines rejected for length or field count
    pub rejected: u64,
    /// Partial lines discarded by the idle timeout
    pub timeouts: u64,
}

/// The main decoder struct - one instance per physical link
#[derive(Debug)]
pub struct SolarisDecoder {
    config: DecoderConfig,
    framer: LineFramer,
    parser: LineParser,
    publisher: Publisher,
    stats: DecoderStats,
}

impl SolarisDecoder {
    /// Create a decoder publishing to `sinks`
    ///
    /// # Example
    /// ```
    /// use solaris_decoder::{DecoderConfig, Field, SensorSinks, SensorValue, SolarisDecoder};
    ///
    /// let sinks = SensorSinks::new().with_sink(Field::Power, |v: SensorValue<'_>| {
    ///     println!("power: {} kW", v);
    /// });
    /// let mut decoder = SolarisDecoder::new(DecoderConfig::new(), sinks).unwrap();
    /// decoder.process(b"0;1;75;0;84;58;61;63;3,2;;3500\n", 0);
    /// assert_eq!(decoder.stats().records, 1);
    /// ```
    pub fn new(config: DecoderConfig, sinks: SensorSinks) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            framer: LineFramer::new(config.line_timeout_ms),
            parser: LineParser::new(config.min_line_len, config.max_line_len),
            publisher: Publisher::new(sinks, config.language),
            stats: DecoderStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Bytes of the line currently being received
    pub fn pending_bytes(&self) -> &[u8] {
        self.framer.pending_bytes()
    }

    /// One polling-loop iteration
    ///
    /// Applies the idle timeout first, then runs every byte through the
    /// framer; each complete line is parsed and, if valid, published.
    /// Never fails: bad input is logged and counted.
    pub fn process(&mut self, bytes: &[u8], now_ms: u64) {
        self.tick(now_ms);

        for &byte in bytes {
            if let Some(line) = self.framer.feed(byte, now_ms) {
                self.stats.lines += 1;
                match self.parser.parse(line) {
                    Ok(ParseOutcome::Record(record)) => {
                        self.publisher.publish(&record);
                        self.stats.records += 1;
                    }
                    Ok(ParseOutcome::Banner(banner)) => {
                        log::trace!("Ignored banner {:?}", banner);
                        self.stats.banners += 1;
                    }
                    Err(_) => {
                        // Already logged by the parser
                        self.stats.rejected += 1;
                    }
                }
            }
        }
    }

    /// Apply the idle timeout without feeding bytes
    pub fn tick(&mut self, now_ms: u64) {
        if self.framer.tick(now_ms) {
            self.stats.timeouts += 1;
        }
    }

    /// Log the decoder configuration and registered sensors
    pub fn dump_config(&self) {
        log::info!("DAIKIN/ROTEX Solaris RPS Configuration:");
        log::info!("  Language: {}", self.config.language);
        log::info!("  Line timeout: {} ms", self.config.line_timeout_ms);
        log::info!(
            "  Line length: {}-{}",
            self.config.min_line_len,
            self.config.max_line_len
        );
        for field in self.publisher.sinks().registered() {
            let sensor = field.sensor();
            log::info!(
                "  {} '{}'",
                sensor.key,
                sensor.display_name(self.config.language)
            );
        }
    }
}
