//! Field parser for telemetry lines.
//!
//! One line carries exactly [`FIELD_COUNT`] comma-separated signed decimal
//! integers with the CR/LF terminator already stripped:
//!
//! ```text
//! <serial>,<o3_ppb>,<temp_c>,<rh_pct>,<adc>,<temp_raw>,<rh_raw>,<day>,<hour>,<min>,<sec>
//! ```

use crate::types::{TelemetryFrame, FIELD_COUNT};

/// Maximum length of one telemetry line, including the CR/LF terminator.
///
/// Eleven fields of up to 19 digits plus signs and separators fit well
/// within this; anything longer is noise on the wire.
pub const MAX_LINE_LENGTH: usize = 256;

/// Error type for frame parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The line ended before all fields were seen; carries the field count
    /// reached.
    TooFewFields(u8),
    /// A twelfth field began before the end of the line.
    TooManyFields,
}

/// Parse a terminator-stripped telemetry line into a [`TelemetryFrame`].
///
/// Splits on `,` and decodes each segment with lenient decimal semantics
/// (see module docs): corrupt segments decode as zero rather than failing
/// the frame. Field *count* is strict: fewer than eleven fields fails with
/// [`ParseError::TooFewFields`], and a twelfth field fails with
/// [`ParseError::TooManyFields`] before the rest of the line is examined.
///
/// # Example
///
/// ```
/// use dgs_proto::{parse_frame, ParseError};
///
/// let frame = parse_frame(b"1,2,3,4,5,6,7,8,9,10,11").unwrap();
/// assert_eq!(frame.o3_ppb, 2);
///
/// assert_eq!(parse_frame(b"1,2,3"), Err(ParseError::TooFewFields(3)));
/// ```
pub fn parse_frame(line: &[u8]) -> Result<TelemetryFrame, ParseError> {
    let mut values = [0i64; FIELD_COUNT];
    let mut parts = line.split(|&b| b == b',');

    for (i, slot) in values.iter_mut().enumerate() {
        match parts.next() {
            Some(segment) => *slot = parse_i64_lenient(segment),
            None => return Err(ParseError::TooFewFields(i as u8)),
        }
    }

    // Should have no more parts
    if parts.next().is_some() {
        return Err(ParseError::TooManyFields);
    }

    Ok(TelemetryFrame::from_values(values))
}

/// Parse a decimal segment with `atoll`-compatible semantics.
///
/// Leading ASCII whitespace is skipped, an optional sign is honored, and
/// digits are consumed up to the first non-digit. No digits means zero.
/// Values beyond the `i64` range saturate.
#[inline]
fn parse_i64_lenient(s: &[u8]) -> i64 {
    let mut idx = 0;
    while idx < s.len() && s[idx].is_ascii_whitespace() {
        idx += 1;
    }

    let mut negative = false;
    if idx < s.len() && (s[idx] == b'+' || s[idx] == b'-') {
        negative = s[idx] == b'-';
        idx += 1;
    }

    let mut value: i64 = 0;
    while idx < s.len() && s[idx].is_ascii_digit() {
        let digit = (s[idx] - b'0') as i64;
        value = value.saturating_mul(10).saturating_add(digit);
        idx += 1;
    }

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn test_parse_example_line() {
        let frame = parse_frame(b"1234567890,42,21,45,100,200,300,5,12,30,15").unwrap();
        assert_eq!(frame.serial, 1234567890);
        assert_eq!(frame.o3_ppb, 42);
        assert_eq!(frame.temperature_c, 21);
        assert_eq!(frame.humidity_pct, 45);
        assert_eq!(frame.adc_raw, 100);
        assert_eq!(frame.temperature_raw, 200);
        assert_eq!(frame.humidity_raw, 300);
        assert_eq!(frame.day, 5);
        assert_eq!(frame.hour, 12);
        assert_eq!(frame.minute, 30);
        assert_eq!(frame.second, 15);
    }

    #[test]
    fn test_parse_negative_fields() {
        let frame = parse_frame(b"1,-3,-12,4,5,6,7,8,9,10,11").unwrap();
        assert_eq!(frame.o3_ppb, -3);
        assert_eq!(frame.temperature_c, -12);
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(parse_frame(b"1,2,3"), Err(ParseError::TooFewFields(3)));
        assert_eq!(parse_frame(b""), Err(ParseError::TooFewFields(1)));
    }

    #[test]
    fn test_too_many_fields() {
        assert_eq!(
            parse_frame(b"1,2,3,4,5,6,7,8,9,10,11,12"),
            Err(ParseError::TooManyFields)
        );
        // A trailing comma opens an empty twelfth field
        assert_eq!(
            parse_frame(b"1,2,3,4,5,6,7,8,9,10,11,"),
            Err(ParseError::TooManyFields)
        );
    }

    #[test]
    fn test_lenient_segments_decode_as_zero() {
        let frame = parse_frame(b"1,abc,3,,5,6,7,8,9,10,11").unwrap();
        assert_eq!(frame.o3_ppb, 0);
        assert_eq!(frame.humidity_pct, 0);
        assert_eq!(frame.temperature_c, 3);
    }

    #[test]
    fn test_lenient_numeric_prefix() {
        let frame = parse_frame(b"1,12x9,3,4,5,6,7,8,9,10,11").unwrap();
        assert_eq!(frame.o3_ppb, 12);
    }

    #[test]
    fn test_lenient_leading_whitespace_and_sign() {
        let frame = parse_frame(b"1, 42,\t-7,+4,5,6,7,8,9,10,11").unwrap();
        assert_eq!(frame.o3_ppb, 42);
        assert_eq!(frame.temperature_c, -7);
        assert_eq!(frame.humidity_pct, 4);
    }

    #[test]
    fn test_lenient_saturates_instead_of_overflowing() {
        let frame = parse_frame(b"99999999999999999999,2,3,4,5,6,7,8,9,10,11").unwrap();
        assert_eq!(frame.serial, i64::MAX);
    }
}
