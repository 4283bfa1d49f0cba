//! Parsing of catalog `dateAdded` timestamps.
//!
//! Catalogs emit two encodings for the same field:
//!
//! | Format | Example |
//! |--------|---------|
//! | Fractional seconds, literal `Z` | `2024-03-01T12:00:00.1234567Z` |
//! | Whole seconds, explicit offset | `2024-03-01T14:00:00+02:00` |
//!
//! Both are reduced to a [`NaiveDateTime`] holding the UTC wall clock, so
//! two strings naming the same absolute moment compare equal.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime};

/// Fractional seconds followed by a literal UTC marker.
pub const FRACTIONAL_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Whole seconds followed by an explicit zone offset.
pub const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parses a `dateAdded` value into a zone-less instant.
///
/// The fractional/UTC format is tried first and the offset format second.
/// Any offset is applied and then dropped.
///
/// # Errors
///
/// Returns [`Error::DateFormat`] if neither format matches.
///
/// # Examples
///
/// ```rust
/// use purgearr::models::parse_added_at;
///
/// let a = parse_added_at("2024-03-01T12:00:00.000Z").unwrap();
/// let b = parse_added_at("2024-03-01T14:00:00+02:00").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_added_at(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(instant) = NaiveDateTime::parse_from_str(value, FRACTIONAL_UTC_FORMAT) {
        return Ok(instant);
    }

    DateTime::parse_from_str(value, OFFSET_FORMAT)
        .map(|instant| instant.naive_utc())
        .map_err(|_| Error::DateFormat {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid test date")
    }

    #[test_case("2024-03-01T12:00:00.000Z" ; "fractional millis")]
    #[test_case("2024-03-01T12:00:00.0000000Z" ; "fractional ticks")]
    #[test_case("2024-03-01T12:00:00Z" ; "whole seconds utc")]
    #[test_case("2024-03-01T12:00:00+00:00" ; "zero offset")]
    #[test_case("2024-03-01T14:00:00+02:00" ; "positive offset")]
    #[test_case("2024-03-01T07:00:00-0500" ; "negative offset without colon")]
    fn test_accepted_formats_normalize_to_same_instant(raw: &str) {
        assert_eq!(
            parse_added_at(raw).expect("should parse"),
            at(2024, 3, 1, 12, 0, 0)
        );
    }

    #[test]
    fn test_fraction_is_kept() {
        let parsed = parse_added_at("2024-03-01T12:00:00.250Z").expect("should parse");
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_offset_crossing_midnight() {
        let parsed = parse_added_at("2024-03-01T01:30:00+03:00").expect("should parse");
        assert_eq!(parsed, at(2024, 2, 29, 22, 30, 0));
    }

    #[test_case("" ; "empty")]
    #[test_case("yesterday" ; "prose")]
    #[test_case("2024-03-01" ; "date only")]
    #[test_case("2024-03-01 12:00:00" ; "space separated naive")]
    #[test_case("2024-03-01T12:00:00" ; "naive without zone")]
    fn test_rejected_formats(raw: &str) {
        let err = parse_added_at(raw).expect_err("should be rejected");
        assert!(matches!(err, Error::DateFormat { .. }));
    }
}
