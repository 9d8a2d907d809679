//! Batch timestamp normalization.
//!
//! Batches arrive stamped in one of two grammars: the ground station's
//! `DD/MM/YYYY HH:MM:SS GMT` form, or ISO-8601 with an optional UTC offset.
//! The station clock runs three hours ahead of the fleet's reference time,
//! so every parsed value gets the same fixed correction.

use chrono::{DateTime, Duration, NaiveDateTime};
use tracing::warn;

/// Hours the ingesting station's clock runs ahead.
const STATION_CLOCK_OFFSET_HOURS: i64 = 3;

const STATION_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const ISO_NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Normalize a raw batch timestamp.
///
/// Returns `None` for absent, blank, or unparseable input; a parse failure
/// is logged but never surfaces as an error to the caller.
pub fn normalize_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = if raw.contains('/') {
        parse_station_format(raw)
    } else {
        parse_iso8601(raw)
    };

    match parsed {
        Some(timestamp) => Some(timestamp - Duration::hours(STATION_CLOCK_OFFSET_HOURS)),
        None => {
            warn!(timestamp = raw, "unparseable batch timestamp");
            None
        }
    }
}

fn parse_station_format(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.strip_suffix("GMT").unwrap_or(raw).trim_end();
    NaiveDateTime::parse_from_str(trimmed, STATION_FORMAT).ok()
}

fn parse_iso8601(raw: &str) -> Option<NaiveDateTime> {
    // Offset-carrying values resolve to the equivalent UTC instant before
    // the wall-clock correction is applied
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, ISO_NAIVE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_station_format_subtracts_three_hours() {
        let normalized = normalize_timestamp(Some("09/10/2025 15:18:07 GMT"));
        assert_eq!(normalized, Some(at(2025, 10, 9, 12, 18, 7)));
    }

    #[test]
    fn test_station_format_without_gmt_token() {
        let normalized = normalize_timestamp(Some("09/10/2025 15:18:07"));
        assert_eq!(normalized, Some(at(2025, 10, 9, 12, 18, 7)));
    }

    #[test]
    fn test_iso_with_offset_resolves_instant_first() {
        // 05:35:24 -04:00 is 09:35:24 UTC, minus the station correction
        let normalized = normalize_timestamp(Some("2025-07-14T05:35:24.000-04:00"));
        assert_eq!(normalized, Some(at(2025, 7, 14, 6, 35, 24)));
    }

    #[test]
    fn test_iso_with_zulu_suffix() {
        let normalized = normalize_timestamp(Some("2025-07-14T09:35:24Z"));
        assert_eq!(normalized, Some(at(2025, 7, 14, 6, 35, 24)));
    }

    #[test]
    fn test_iso_without_offset() {
        let normalized = normalize_timestamp(Some("2025-07-14T09:35:24"));
        assert_eq!(normalized, Some(at(2025, 7, 14, 6, 35, 24)));
    }

    #[test]
    fn test_iso_fractional_seconds_without_offset() {
        let normalized = normalize_timestamp(Some("2025-07-14T09:35:24.250"));
        let expected = at(2025, 7, 14, 6, 35, 24) + Duration::milliseconds(250);
        assert_eq!(normalized, Some(expected));
    }

    #[test]
    fn test_absent_and_blank_inputs() {
        assert_eq!(normalize_timestamp(None), None);
        assert_eq!(normalize_timestamp(Some("")), None);
        assert_eq!(normalize_timestamp(Some("   ")), None);
    }

    #[test]
    fn test_unparseable_inputs_degrade_to_none() {
        assert_eq!(normalize_timestamp(Some("not a timestamp")), None);
        assert_eq!(normalize_timestamp(Some("99/99/2025 15:18:07 GMT")), None);
        assert_eq!(normalize_timestamp(Some("2025-13-40T99:00:00")), None);
    }

    #[test]
    fn test_correction_crosses_midnight() {
        let normalized = normalize_timestamp(Some("01/01/2026 01:30:00 GMT"));
        assert_eq!(normalized, Some(at(2025, 12, 31, 22, 30, 0)));
    }
}
