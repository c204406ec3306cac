//! Telemetry line parser
//!
//! Turns one complete line (`HA;BK;P1;P2;TK;TR;TS;TV;DF;ERR;PWR`) into a
//! [`ParsedRecord`] in a single pass over the bytes.
//!
//! ## Rules
//! - Lines outside the configured length bounds are rejected, unless they
//!   start with one of the boot banner prefixes, which are reported as
//!   [`ParseOutcome::Banner`]
//! - Exactly [`TOTAL_FIELDS`] tokens must be present; otherwise the whole line
//!   is rejected and nothing is published
//! - A token that fails to convert degrades to 0 (or 0.0) and parsing goes on
//! - The flow rate uses a comma as decimal separator

use crate::types::{
    Banner, Conversion, Field, ParseOutcome, ParsedRecord, RejectReason, NO_ERROR, TOTAL_FIELDS,
};

/// Minimum valid line length
pub const MIN_LINE_LEN: usize = 22;

/// Maximum valid line length
pub const MAX_LINE_LEN: usize = 48;

/// Capacity of the scratch buffer used for numeric conversions
pub const CONVERSION_BUFFER_SIZE: usize = 16;

/// Column header as the controller means it, shown when its banner arrives
const COLUMN_HEADER_UTF8: &str = "HA;BK;P1 /%;P2;TK /°C;TR /°C;TS /°C;TV /°C;V /l/min;ERROR;P/W";

/// Single-pass line parser with a reusable conversion buffer
#[derive(Debug, Clone)]
pub struct LineParser {
    min_len: usize,
    max_len: usize,
    scratch: [u8; CONVERSION_BUFFER_SIZE],
}

impl LineParser {
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self {
            min_len,
            max_len,
            scratch: [0u8; CONVERSION_BUFFER_SIZE],
        }
    }

    /// Parse a complete line (without line terminator)
    pub fn parse(&mut self, line: &[u8]) -> Result<ParseOutcome, RejectReason> {
        let len = line.len();
        log::info!("Parsing line: '{}' (len={})", String::from_utf8_lossy(line), len);

        if len < self.min_len || len > self.max_len {
            if let Some(banner) = Banner::detect(line) {
                log::info!("Boot/info line detected, ignoring.");
                if banner == Banner::ColumnHeader {
                    log::info!("Solaris line UTF-8: '{}'", COLUMN_HEADER_UTF8);
                }
                return Ok(ParseOutcome::Banner(banner));
            }

            let reason = RejectReason::InvalidLength {
                len,
                min: self.min_len,
                max: self.max_len,
            };
            log::error!("Parsing line: '{}'", String::from_utf8_lossy(line));
            log::error!("{}", reason);
            return Err(reason);
        }

        let mut ints = [0i32; TOTAL_FIELDS];
        let mut flow_rate = 0.0f64;
        let mut error_code = NO_ERROR;
        let mut token_idx = 0usize;
        let mut token_start = 0usize;

        for i in 0..=len {
            let is_delimiter = i == len || line[i] == b';';
            if !is_delimiter || token_idx >= TOTAL_FIELDS {
                continue;
            }

            let token = &line[token_start..i];
            // token_idx < TOTAL_FIELDS, so the field always exists
            if let Some(field) = Field::from_index(token_idx) {
                match field.conversion() {
                    Conversion::LocaleFloat => {
                        flow_rate = self.convert_float(field, token);
                        log::debug!("Token[{}] = {:.1}", token_idx, flow_rate);
                    }
                    Conversion::Code => {
                        error_code = token.first().map_or(NO_ERROR, |&b| char::from(b));
                        if error_code != NO_ERROR {
                            log::error!("Token[{}] = '{}'", token_idx, error_code);
                        } else {
                            log::debug!("Token[{}] = ''", token_idx);
                        }
                    }
                    Conversion::Integer => {
                        ints[token_idx] = self.convert_int(field, token);
                        log::debug!("Token[{}] = {}", token_idx, ints[token_idx]);
                    }
                }
            }

            token_start = i + 1;
            token_idx += 1;
        }

        if token_idx != TOTAL_FIELDS {
            let reason = RejectReason::Incomplete {
                found: token_idx,
                expected: TOTAL_FIELDS,
            };
            log::error!("{}", reason);
            return Err(reason);
        }

        log::debug!("Parse complete: {} tokens processed successfully", token_idx);
        Ok(ParseOutcome::Record(ParsedRecord::new(ints, flow_rate, error_code)))
    }

    /// Copy a token into the scratch buffer, returning the used length
    fn load_scratch(&mut self, token: &[u8]) -> Option<usize> {
        if token.len() >= CONVERSION_BUFFER_SIZE {
            return None;
        }
        self.scratch = [0u8; CONVERSION_BUFFER_SIZE];
        self.scratch[..token.len()].copy_from_slice(token);
        Some(token.len())
    }

    fn convert_int(&mut self, field: Field, token: &[u8]) -> i32 {
        if token.is_empty() {
            return 0;
        }
        let Some(len) = self.load_scratch(token) else {
            log::error!(
                "Token {} ({}) too long ({} chars), using 0",
                field.index(),
                field,
                token.len()
            );
            return 0;
        };

        match parse_int_prefix(&self.scratch[..len]) {
            Some(value) => value,
            None => {
                log::error!("Failed to parse token {}, using 0", field.index());
                0
            }
        }
    }

    fn convert_float(&mut self, field: Field, token: &[u8]) -> f64 {
        if token.is_empty() {
            return 0.0;
        }
        let Some(len) = self.load_scratch(token) else {
            log::error!(
                "Token {} ({}) too long ({} chars), using 0.0",
                field.index(),
                field,
                token.len()
            );
            return 0.0;
        };

        let digits = &mut self.scratch[..len];
        for b in digits.iter_mut() {
            if *b == b',' {
                *b = b'.';
            }
        }

        match parse_float_prefix(digits) {
            Some(value) => value,
            None => {
                log::error!("Failed to parse {} at token {}", field, field.index());
                0.0
            }
        }
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(MIN_LINE_LEN, MAX_LINE_LEN)
    }
}

/// Skip leading whitespace the way C's `isspace` does
fn skip_whitespace(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
        .count()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parse the leading base-10 integer of `bytes`
///
/// Accepts optional whitespace and sign before the digits and ignores
/// anything after them. Out-of-range values saturate. `None` if no digit.
pub(crate) fn parse_int_prefix(bytes: &[u8]) -> Option<i32> {
    let mut i = skip_whitespace(bytes);
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let digits = count_digits(&bytes[i..]);
    if digits == 0 {
        return None;
    }

    let magnitude = bytes[i..i + digits].iter().fold(0i64, |acc, &b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    let value = if negative { -magnitude } else { magnitude };
    Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Parse the leading decimal number of `bytes` (`.` as separator, optional exponent)
///
/// `None` if no mantissa digit is present.
pub(crate) fn parse_float_prefix(bytes: &[u8]) -> Option<f64> {
    let start = skip_whitespace(bytes);
    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts if at least one digit follows
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j.min(bytes.len())..]);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    std::str::from_utf8(&bytes[start..i]).ok()?.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_record(line: &str) -> ParsedRecord {
        let mut parser = LineParser::default();
        match parser.parse(line.as_bytes()) {
            Ok(ParseOutcome::Record(record)) => record,
            other => panic!("expected record for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_parse_reference_line() {
        let record = parse_record("0;1;75;0;84;58;61;63;3,2;;3500");
        assert!(!record.manual_operation());
        assert!(record.burner_contact());
        assert_eq!(record.pump_speed(), 75);
        assert!(!record.booster_pump());
        assert_eq!(record.collector_temperature(), 84);
        assert_eq!(record.return_temperature(), 58);
        assert_eq!(record.storage_temperature(), 61);
        assert_eq!(record.flow_temperature(), 63);
        assert!((record.flow_rate() - 3.2).abs() < 1e-6);
        assert_eq!(record.error_code(), NO_ERROR);
        assert!(!record.has_error());
        assert_eq!(record.power_watts(), 3500);
    }

    #[test]
    fn test_error_code_and_negative_values() {
        let record = parse_record("1;0;100;1;-12;40;55;47;12,75;K;12345");
        assert!(record.manual_operation());
        assert_eq!(record.collector_temperature(), -12);
        assert!((record.flow_rate() - 12.75).abs() < 1e-9);
        assert_eq!(record.error_code(), 'K');
        assert_eq!(record.power_kw(), 12.35);
    }

    #[test]
    fn test_multi_char_error_takes_first() {
        let record = parse_record("0;1;75;0;84;58;61;63;3,2;KR;3500");
        assert_eq!(record.error_code(), 'K');
    }

    #[test]
    fn test_bad_tokens_degrade_to_zero() {
        let record = parse_record("0;1;xx;0;84;58;61;63;abc;;3500");
        assert_eq!(record.pump_speed(), 0);
        assert_eq!(record.flow_rate(), 0.0);
        assert_eq!(record.collector_temperature(), 84);
        assert_eq!(record.power_watts(), 3500);
    }

    #[test]
    fn test_empty_tokens_are_zero() {
        let record = parse_record(";;;;84;58;61;63;;;3500;;;");
        assert_eq!(record.pump_speed(), 0);
        assert!(!record.manual_operation());
        assert_eq!(record.flow_rate(), 0.0);
        assert_eq!(record.power_watts(), 3500);
    }

    #[test]
    fn test_too_short_rejected() {
        let mut parser = LineParser::default();
        let result = parser.parse(b"0;1;75;0");
        assert_eq!(
            result,
            Err(RejectReason::InvalidLength { len: 8, min: 22, max: 48 })
        );
    }

    #[test]
    fn test_too_long_rejected() {
        let mut parser = LineParser::default();
        let line = "0;1;75;0;84;58;61;63;3,2;;3500;;;;;;;;;;;;;;;;;;;;;;";
        assert!(line.len() > MAX_LINE_LEN);
        assert!(matches!(
            parser.parse(line.as_bytes()),
            Err(RejectReason::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_banners_ignored() {
        let mut parser = LineParser::default();
        assert_eq!(
            parser.parse(b"SOLARIS RPS4"),
            Ok(ParseOutcome::Banner(Banner::Product))
        );
        assert_eq!(
            parser.parse(b"Zyklus"),
            Ok(ParseOutcome::Banner(Banner::Cycle))
        );
        let header = b"HA;BK;P1 /%;P2;TK /\xb0C;TR /\xb0C;TS /\xb0C;TV /\xb0C;V /l/min;ERROR;P/W";
        assert!(header.len() > MAX_LINE_LEN);
        assert_eq!(
            parser.parse(header),
            Ok(ParseOutcome::Banner(Banner::ColumnHeader))
        );
        // Trailing content after the prefix is still a banner
        assert_eq!(
            parser.parse(b"SOLARIS garbage that is long enough to exceed the bounds"),
            Ok(ParseOutcome::Banner(Banner::Product))
        );
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut parser = LineParser::default();
        let line = b"0;1;75;0;84;58;61;63;3,2;3500000";
        assert!(line.len() >= MIN_LINE_LEN);
        assert_eq!(
            parser.parse(line),
            Err(RejectReason::Incomplete { found: 10, expected: 11 })
        );
    }

    #[test]
    fn test_extra_fields_ignored() {
        let record = parse_record("0;1;75;0;84;58;61;63;3,2;;3500;99;98");
        assert_eq!(record.power_watts(), 3500);
    }

    #[test]
    fn test_oversized_token_zeroed() {
        let record = parse_record("0;1;75;0;84;58;61;63;1234567890,123456;;1");
        assert_eq!(record.flow_rate(), 0.0);
        assert_eq!(record.power_watts(), 1);
    }

    #[test]
    fn test_oversized_int_token_zeroed() {
        // 16 bytes leave no room in the scratch buffer
        let record = parse_record("0;1;1234567890123456;0;84;58;61;63;3,2;;1");
        assert_eq!(record.pump_speed(), 0);
        assert_eq!(record.collector_temperature(), 84);
        assert_eq!(record.power_watts(), 1);

        let record = parse_record("0;1;75;0;84;58;61;63;3,2;;-0000000000000042");
        assert_eq!(record.pump_speed(), 75);
        assert_eq!(record.power_watts(), 0);

        // 15 bytes still fit
        let record = parse_record("0;1;000000000000075;0;84;58;61;63;3,2;;1");
        assert_eq!(record.pump_speed(), 75);
    }

    #[test]
    fn test_int_prefix() {
        assert_eq!(parse_int_prefix(b"42"), Some(42));
        assert_eq!(parse_int_prefix(b"  -7"), Some(-7));
        assert_eq!(parse_int_prefix(b"+3x"), Some(3));
        assert_eq!(parse_int_prefix(b"12abc"), Some(12));
        assert_eq!(parse_int_prefix(b"abc"), None);
        assert_eq!(parse_int_prefix(b"-"), None);
        assert_eq!(parse_int_prefix(b"99999999999"), Some(i32::MAX));
        assert_eq!(parse_int_prefix(b"-99999999999"), Some(i32::MIN));
    }

    #[test]
    fn test_float_prefix() {
        assert_eq!(parse_float_prefix(b"3.2"), Some(3.2));
        assert_eq!(parse_float_prefix(b" -0.5"), Some(-0.5));
        assert_eq!(parse_float_prefix(b".5"), Some(0.5));
        assert_eq!(parse_float_prefix(b"7."), Some(7.0));
        assert_eq!(parse_float_prefix(b"1e2"), Some(100.0));
        assert_eq!(parse_float_prefix(b"1e"), Some(1.0));
        assert_eq!(parse_float_prefix(b"2.5l/min"), Some(2.5));
        assert_eq!(parse_float_prefix(b"."), None);
        assert_eq!(parse_float_prefix(b"abc"), None);
        assert_eq!(parse_float_prefix(b""), None);
    }
}
