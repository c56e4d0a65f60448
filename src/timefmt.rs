//! Relative time formatting for the activity list
//!
//! Buckets an epoch-millisecond timestamp against "now" into the display
//! strings the panel uses: 刚刚 (just now), N分钟前, N小时前, N天前.

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Format `timestamp_ms` relative to `now_ms`
pub fn format_relative(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    if diff < MINUTE_MS {
        "刚刚".to_string()
    } else if diff < HOUR_MS {
        format!("{}分钟前", diff / MINUTE_MS)
    } else if diff < DAY_MS {
        format!("{}小时前", diff / HOUR_MS)
    } else {
        format!("{}天前", diff / DAY_MS)
    }
}
