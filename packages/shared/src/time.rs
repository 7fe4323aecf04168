use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to an RFC 3339 string in UTC.
///
/// ```
/// use hiroba_shared::time::timestamp_to_rfc3339;
///
/// assert_eq!(timestamp_to_rfc3339(0), "1970-01-01T00:00:00.000Z");
/// ```
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => String::new(),
    }
}

/// Parse an RFC 3339 string into a Unix timestamp (milliseconds).
///
/// Returns `None` when the input is not a valid RFC 3339 date-time.
pub fn rfc3339_to_timestamp(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
}
