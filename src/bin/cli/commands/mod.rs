pub mod import;
pub mod queue;
pub mod review;
pub mod stats;

use chrono::{DateTime, Utc};

use lingo_lib::srs::{format_interval, SchedulingRecord, ONE_DAY_MS};

pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const GRAY: &str = "\x1b[90m";
pub const RESET: &str = "\x1b[0m";

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, RESET)
    } else {
        text.to_string()
    }
}

/// "new", "due", or time left until the next review
pub fn due_label(record: &SchedulingRecord, now_ms: i64) -> String {
    if record.is_new() {
        "new".to_string()
    } else if record.is_due(now_ms) {
        "due".to_string()
    } else {
        // Round partial days up so "in 1d" never means "now"
        let remaining = record.next_review_at - now_ms;
        let days = (remaining + ONE_DAY_MS - 1) / ONE_DAY_MS;
        format!("in {}", format_interval(u32::try_from(days).unwrap_or(u32::MAX)))
    }
}

/// RFC 3339 time of the next review, if scheduled
pub fn next_review_time(record: &SchedulingRecord) -> Option<String> {
    if record.is_new() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(record.next_review_at).map(|t| t.to_rfc3339())
}
