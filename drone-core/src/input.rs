//! Parsing of the three form fields (latitude, longitude, duration).
//!
//! Coordinates are parsed leniently: the longest numeric prefix wins and
//! anything unparseable becomes NaN, which the stepper carries through
//! without complaint. The duration is the only field that is validated.

use crate::error::{Result, StepperError};
use crate::run::RunConfig;

/// Parses a coordinate the way a browser `parseFloat` would.
///
/// Leading whitespace is skipped, trailing garbage is ignored, and input with
/// no numeric prefix yields NaN.
pub fn parse_coordinate(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Parses the duration field as a whole number of ticks.
///
/// Like `parseInt`, a fractional part or trailing text is dropped, so
/// `"2.9"` is two ticks.
pub fn parse_duration(input: &str) -> Result<RunConfig> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return Err(StepperError::InvalidDuration(input.to_string()));
    }

    let prefix = &s[..sign + digits];
    if prefix.starts_with('-') {
        // "-0" is still zero
        if s[1..1 + digits].bytes().all(|b| b == b'0') {
            return Err(StepperError::ZeroDuration);
        }
        return Err(StepperError::InvalidDuration(input.to_string()));
    }

    let ticks: u32 = prefix
        .trim_start_matches('+')
        .parse()
        .map_err(|_| StepperError::InvalidDuration(input.to_string()))?;
    RunConfig::new(ticks)
}

/// Whether the start control should be enabled.
pub fn can_start(lat: &str, lng: &str, time: &str, is_simulating: bool) -> bool {
    !is_simulating && !lat.is_empty() && !lng.is_empty() && !time.is_empty()
}

/// Whether the remove-drone control should be offered.
pub fn can_remove(drone_count: usize) -> bool {
    drone_count > 1
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate_plain() {
        assert_eq!(parse_coordinate("12.5"), 12.5);
        assert_eq!(parse_coordinate("-33.86"), -33.86);
        assert_eq!(parse_coordinate("+7"), 7.0);
        assert_eq!(parse_coordinate(".5"), 0.5);
        assert_eq!(parse_coordinate("5."), 5.0);
        assert_eq!(parse_coordinate("1e2"), 100.0);
    }

    #[test]
    fn test_parse_coordinate_prefix() {
        assert_eq!(parse_coordinate("  40.7abc"), 40.7);
        assert_eq!(parse_coordinate("3e"), 3.0);
        assert_eq!(parse_coordinate("3e+x"), 3.0);
        assert_eq!(parse_coordinate("1.2.3"), 1.2);
        assert_eq!(parse_coordinate("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parse_coordinate_garbage_is_nan() {
        assert!(parse_coordinate("").is_nan());
        assert!(parse_coordinate("north").is_nan());
        assert!(parse_coordinate("-").is_nan());
        assert!(parse_coordinate(".").is_nan());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10").unwrap().duration_ticks(), 10);
        assert_eq!(parse_duration(" 3s").unwrap().duration_ticks(), 3);
        assert_eq!(parse_duration("2.9").unwrap().duration_ticks(), 2);
        assert_eq!(parse_duration("+4").unwrap().duration_ticks(), 4);
    }

    #[test]
    fn test_parse_duration_rejects() {
        assert_eq!(parse_duration("0"), Err(StepperError::ZeroDuration));
        assert_eq!(parse_duration("-0"), Err(StepperError::ZeroDuration));
        assert!(matches!(
            parse_duration("-5"),
            Err(StepperError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_duration(""),
            Err(StepperError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_duration("soon"),
            Err(StepperError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_duration("99999999999"),
            Err(StepperError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_can_start() {
        assert!(can_start("1", "2", "3", false));
        assert!(!can_start("1", "2", "3", true));
        assert!(!can_start("", "2", "3", false));
        assert!(!can_start("1", "", "3", false));
        assert!(!can_start("1", "2", "", false));
        // only emptiness is checked, not numeric validity
        assert!(can_start("x", "y", "z", false));
    }

    #[test]
    fn test_can_remove() {
        assert!(!can_remove(0));
        assert!(!can_remove(1));
        assert!(can_remove(2));
    }
}
