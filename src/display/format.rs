//! Human-readable formatting helpers shared by the listing commands

use chrono::{DateTime, Duration, Local, Utc};

/// Format the age of a timestamp relative to `now`, e.g. `42s ago`, `3h ago`
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!("{} ago", format_duration(now.signed_duration_since(timestamp)))
}

fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    format!("{}d", hours / 24)
}

/// Format a byte count as kilobytes with two decimals, e.g. `1.50 KB`
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Format a UTC timestamp in the user's local time zone
pub fn format_local(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
