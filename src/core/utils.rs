use chrono::{DateTime, FixedOffset, SecondsFormat};

/// RFC 3339 with millisecond precision, e.g. `2025-03-20T08:15:00.123+00:00`.
pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, false)
}
