//! Time helpers. All timestamps are Unix milliseconds, rendered in JST.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// JST is UTC+9
const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current Unix timestamp in milliseconds.
pub fn get_jst_timestamp() -> i64 {
    Utc::now().with_timezone(&jst()).timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to RFC 3339 in JST.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .with_timezone(&jst())
        .to_rfc3339()
}

/// Seconds elapsed between two millisecond timestamps, never negative.
pub fn elapsed_secs(from_millis: i64, to_millis: i64) -> f64 {
    (to_millis - from_millis).max(0) as f64 / 1000.0
}
