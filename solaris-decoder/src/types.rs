//! Core types for the Solaris telemetry decoder
//!
//! This module defines the field layout of one telemetry line, the decoded
//! record handed from the parser to the publisher, and the error/outcome types
//! of the decoding pipeline.

use serde::Serialize;
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Total number of semicolon-delimited fields in one complete data line
pub const TOTAL_FIELDS: usize = 11;

/// Error code value meaning "no error" (empty ERR token on the wire)
pub const NO_ERROR: char = '\0';

/// One field of the telemetry line, in wire order
///
/// Wire format: `HA;BK;P1;P2;TK;TR;TS;TV;DF;ERR;PWR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Manual operation flag (HA, 0/1)
    ManualOperation = 0,
    /// Burner contact flag (BK, 0/1)
    BurnerContact = 1,
    /// Circulation pump speed (P1, 0-100 %)
    PumpSpeed = 2,
    /// Booster pump flag (P2, 0/1)
    BoosterPump = 3,
    /// Collector temperature (TK, °C)
    CollectorTemperature = 4,
    /// Return temperature (TR, °C)
    ReturnTemperature = 5,
    /// Storage temperature (TS, °C)
    StorageTemperature = 6,
    /// Flow temperature (TV, °C)
    FlowTemperature = 7,
    /// Flow rate (DF, l/min, comma decimal separator)
    FlowRate = 8,
    /// Error code (ERR, empty or a single character)
    ErrorCode = 9,
    /// Power output (PWR, watts on the wire)
    Power = 10,
}

impl Field {
    /// All fields in wire order
    pub const ALL: [Field; TOTAL_FIELDS] = [
        Field::ManualOperation,
        Field::BurnerContact,
        Field::PumpSpeed,
        Field::BoosterPump,
        Field::CollectorTemperature,
        Field::ReturnTemperature,
        Field::StorageTemperature,
        Field::FlowTemperature,
        Field::FlowRate,
        Field::ErrorCode,
        Field::Power,
    ];

    /// Position of this field in the line (0-based token index)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field for a token index, if the index is within the line layout
    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index).copied()
    }

    /// Column label used by the controller for this field
    pub fn label(self) -> &'static str {
        match self {
            Field::ManualOperation => "HA",
            Field::BurnerContact => "BK",
            Field::PumpSpeed => "P1",
            Field::BoosterPump => "P2",
            Field::CollectorTemperature => "TK",
            Field::ReturnTemperature => "TR",
            Field::StorageTemperature => "TS",
            Field::FlowTemperature => "TV",
            Field::FlowRate => "DF",
            Field::ErrorCode => "ERR",
            Field::Power => "PWR",
        }
    }

    /// How the token of this field is converted
    pub fn conversion(self) -> Conversion {
        match self {
            Field::FlowRate => Conversion::LocaleFloat,
            Field::ErrorCode => Conversion::Code,
            _ => Conversion::Integer,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-field token conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Base-10 signed integer
    Integer,
    /// Decimal number with comma as decimal separator
    LocaleFloat,
    /// First character of the token, or [`NO_ERROR`] if empty
    Code,
}

/// A fully decoded telemetry line
///
/// Integer-valued fields live in a fixed array indexed by [`Field`]; the
/// slots of the flow rate and error code fields stay zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRecord {
    ints: [i32; TOTAL_FIELDS],
    flow_rate: f64,
    error_code: char,
}

impl ParsedRecord {
    pub(crate) fn new(ints: [i32; TOTAL_FIELDS], flow_rate: f64, error_code: char) -> Self {
        Self {
            ints,
            flow_rate,
            error_code,
        }
    }

    /// Raw integer value of an integer-valued field (0 for flow rate and error code)
    pub fn int(&self, field: Field) -> i32 {
        self.ints[field.index()]
    }

    pub fn manual_operation(&self) -> bool {
        self.int(Field::ManualOperation) != 0
    }

    pub fn burner_contact(&self) -> bool {
        self.int(Field::BurnerContact) != 0
    }

    pub fn booster_pump(&self) -> bool {
        self.int(Field::BoosterPump) != 0
    }

    /// Circulation pump speed in percent
    pub fn pump_speed(&self) -> i32 {
        self.int(Field::PumpSpeed)
    }

    pub fn collector_temperature(&self) -> i32 {
        self.int(Field::CollectorTemperature)
    }

    pub fn return_temperature(&self) -> i32 {
        self.int(Field::ReturnTemperature)
    }

    pub fn storage_temperature(&self) -> i32 {
        self.int(Field::StorageTemperature)
    }

    pub fn flow_temperature(&self) -> i32 {
        self.int(Field::FlowTemperature)
    }

    /// Flow rate in l/min
    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    /// Error code character, [`NO_ERROR`] when the controller reports none
    pub fn error_code(&self) -> char {
        self.error_code
    }

    pub fn has_error(&self) -> bool {
        self.error_code != NO_ERROR
    }

    /// Power output in watts, as received
    pub fn power_watts(&self) -> i32 {
        self.int(Field::Power)
    }

    /// Power output in kW, rounded to 2 decimals (half away from zero)
    pub fn power_kw(&self) -> f64 {
        let watts = i64::from(self.power_watts());
        // Round to the nearest 10 W in integer space to avoid binary float ties
        let centi_kw = if watts >= 0 {
            (watts + 5) / 10
        } else {
            (watts - 5) / 10
        };
        centi_kw as f64 / 100.0
    }
}

/// Informational lines the controller prints once at power-on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Product name line (`SOLARIS...`)
    Product,
    /// Cycle counter line (`Zyklus...`)
    Cycle,
    /// Column header line (`HA;BK;P1...`)
    ColumnHeader,
}

impl Banner {
    /// Literal prefix identifying this banner
    pub fn prefix(self) -> &'static [u8] {
        match self {
            Banner::Product => b"SOLARIS",
            Banner::Cycle => b"Zyklus",
            Banner::ColumnHeader => b"HA;BK;P1",
        }
    }

    /// Match a line against the known banner prefixes
    pub fn detect(line: &[u8]) -> Option<Banner> {
        [Banner::Product, Banner::Cycle, Banner::ColumnHeader]
            .into_iter()
            .find(|banner| line.starts_with(banner.prefix()))
    }
}

/// Successful result of parsing one line
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// A complete, structurally valid data line
    Record(ParsedRecord),
    /// A recognized boot banner; ignored, not an error
    Banner(Banner),
}

/// Why a line was discarded without publishing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("Invalid line length ({len}), expected {min}-{max}")]
    InvalidLength { len: usize, min: usize, max: usize },

    #[error("Incomplete data: only {found} tokens found, expected {expected}")]
    Incomplete { found: usize, expected: usize },
}

/// Errors that can occur while setting up the decoder
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown sensor key: {0}")]
    UnknownSensor(String),
}

/// A value handed to a sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue<'a> {
    /// On/off state
    Binary(bool),
    /// Integer reading
    Integer(i32),
    /// Floating-point reading
    Float(f64),
    /// Text state
    Text(&'a str),
}

impl fmt::Display for SensorValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorValue::Binary(v) => write!(f, "{}", if *v { "ON" } else { "OFF" }),
            SensorValue::Integer(v) => write!(f, "{}", v),
            SensorValue::Float(v) => write!(f, "{}", v),
            SensorValue::Text(v) => write!(f, "{}", v),
        }
    }
}
