//! Decoder configuration types
//!
//! This module defines the settings of one decoder instance (one physical
//! link). Sink registration is not part of the configuration; sinks are
//! handed to the decoder at construction time.

use crate::error_codes::Language;
use crate::framer::{BUFFER_SIZE, LINE_TIMEOUT_MS};
use crate::parser::{MAX_LINE_LEN, MIN_LINE_LEN};
use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Language of error descriptions
    #[serde(default)]
    pub language: Language,

    /// Idle time in milliseconds after which a partial line is discarded
    #[serde(default = "default_line_timeout")]
    pub line_timeout_ms: u64,

    /// Shortest accepted data line
    #[serde(default = "default_min_line_len")]
    pub min_line_len: usize,

    /// Longest accepted data line
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

fn default_line_timeout() -> u64 {
    LINE_TIMEOUT_MS
}

fn default_min_line_len() -> usize {
    MIN_LINE_LEN
}

fn default_max_line_len() -> usize {
    MAX_LINE_LEN
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            line_timeout_ms: default_line_timeout(),
            min_line_len: default_min_line_len(),
            max_line_len: default_max_line_len(),
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the error description language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Builder method: set the line timeout
    pub fn with_line_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.line_timeout_ms = timeout_ms;
        self
    }

    /// Builder method: set the accepted line length range (inclusive)
    pub fn with_line_length_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_line_len = min;
        self.max_line_len = max;
        self
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.min_line_len > self.max_line_len {
            return Err(DecoderError::InvalidConfig(format!(
                "min_line_len ({}) is greater than max_line_len ({})",
                self.min_line_len, self.max_line_len
            )));
        }
        if self.max_line_len >= BUFFER_SIZE {
            return Err(DecoderError::InvalidConfig(format!(
                "max_line_len ({}) must be below the line buffer size ({})",
                self.max_line_len, BUFFER_SIZE
            )));
        }
        if self.line_timeout_ms == 0 {
            return Err(DecoderError::InvalidConfig(
                "line_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
