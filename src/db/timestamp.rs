//! Timestamp text encoding.
//!
//! Columns hold UTC as fixed-width `YYYY-MM-DD HH:MM:SS.ffffff`, so string
//! comparison in SQL orders rows chronologically.

use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};

use super::DatabaseError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Current UTC time at the precision the columns store.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub fn format(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Text for an inclusive lower bound. Sub-microsecond input rounds up, so
/// a row stored just before `ts` is never pulled inside the range.
pub fn format_lower_bound(ts: &NaiveDateTime) -> String {
    let truncated = ts.trunc_subsecs(6);
    if truncated < *ts {
        format(&(truncated + Duration::microseconds(1)))
    } else {
        format(&truncated)
    }
}

/// Accepts any fractional precision, not only the stored six digits.
pub fn parse(field: &str, value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f").map_err(|_| {
        DatabaseError::InvalidTimestamp {
            field: field.into(),
            value: value.into(),
        }
    })
}
