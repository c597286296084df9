pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 UTC timestamp with millisecond precision and a `Z` suffix.
/// Fixed width, so lexical order equals chronological order.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn iso_now() -> String {
    iso_timestamp(Utc::now())
}
