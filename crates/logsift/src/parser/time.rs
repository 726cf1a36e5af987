use chrono::{DateTime, Utc};

/// The `$time_local` layout nginx writes, e.g. `12/Sep/2025:09:12:03 +0800`.
const TIME_LOCAL_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Convert a `time_local` value to an ISO-8601 UTC string.
///
/// Returns the input unchanged when it does not match the fixed layout;
/// normalization never fails to the caller.
pub fn normalize_time_local(raw: &str) -> String {
    match DateTime::parse_from_str(raw, TIME_LOCAL_FORMAT) {
        Ok(dt) => dt.with_timezone(&Utc).to_rfc3339(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_positive_offset() {
        assert_eq!(
            normalize_time_local("12/Sep/2025:09:12:03 +0800"),
            "2025-09-12T01:12:03+00:00"
        );
    }

    #[test]
    fn test_normalize_negative_offset() {
        assert_eq!(
            normalize_time_local("10/Oct/2000:13:55:36 -0700"),
            "2000-10-10T20:55:36+00:00"
        );
    }

    #[test]
    fn test_normalize_utc_is_identity_instant() {
        assert_eq!(
            normalize_time_local("29/Jan/2026:10:59:12 +0000"),
            "2026-01-29T10:59:12+00:00"
        );
    }

    #[test]
    fn test_offset_crossing_midnight() {
        assert_eq!(
            normalize_time_local("01/Jan/2025:05:00:00 +0800"),
            "2024-12-31T21:00:00+00:00"
        );
    }

    #[test]
    fn test_unparsable_input_returned_unchanged() {
        for raw in [
            "",
            "not a timestamp",
            "12/Xyz/2025:09:12:03 +0800",
            "32/Sep/2025:09:12:03 +0800",
            "12/Sep/2025:09:12:03",
        ] {
            assert_eq!(normalize_time_local(raw), raw);
        }
    }
}
