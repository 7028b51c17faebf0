use chrono::{DateTime, Utc};

/// Parse an `X-Agent-Request-Time` value: RFC 3339 first, then epoch seconds.
pub fn parse_request_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Epoch seconds, the form emitted by [`crate::RequestSigner`].
pub fn format_request_time(t: DateTime<Utc>) -> String {
    t.timestamp().to_string()
}
