//! # Temporal Types
//!
//! Due dates are calendar dates without a time component, exchanged as
//! `YYYY-MM-DD`. Server timestamps (`created_at`, `updated_at`) are UTC.
//!
//! Backends differ in how they render timestamps: some emit RFC 3339 with an
//! offset, others a naive ISO datetime. [`lenient_datetime`] accepts both and
//! treats naive values as UTC. Unreadable timestamps are dropped rather than
//! failing the record that carries them.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::ValidationError;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date, ignoring surrounding whitespace.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if trimmed.len() != 10 {
        return Err(ValidationError::InvalidDate {
            value: input.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: input.to_string(),
    })
}

/// Render a calendar date in wire format.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Signed number of calendar days from `today` until `due`.
///
/// Negative when the due date has already passed.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a server timestamp as RFC 3339, falling back to a naive ISO
/// datetime interpreted as UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serde adapter for optional server timestamps. Use with
/// `#[serde(default, deserialize_with = "lenient_datetime::deserialize")]`.
pub mod lenient_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Deserialize `null`, RFC 3339 or naive ISO datetimes. Anything else,
    /// including non-string values, becomes `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => super::parse_timestamp(&s),
            _ => None,
        })
    }
}
