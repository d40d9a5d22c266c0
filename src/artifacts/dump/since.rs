//! Lower bound for incremental dumps
//!
//! Accepted forms, tried in order:
//!
//! - RFC 3339: `2024-01-01T10:00:00Z`, `2024-01-01T10:00:00+02:00`
//! - `2024-01-01 10:00:00 +0200`
//! - `2024-01-01T10:00:00` and `2024-01-01 10:00:00` (UTC)
//! - `2024-01-01` (midnight UTC)

use crate::artifacts::dump::DumpError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const OFFSET_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S %z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_since(input: &str) -> Result<DateTime<FixedOffset>, DumpError> {
    let input = input.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp);
    }

    for format in OFFSET_FORMATS {
        if let Ok(timestamp) = DateTime::parse_from_str(input, format) {
            return Ok(timestamp);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(timestamp.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc().fixed_offset())
        .ok_or_else(|| DumpError::InvalidSince(input.to_string()))
}
