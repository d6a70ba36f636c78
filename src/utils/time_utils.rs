use chrono::Local;

/// Wall-clock epoch milliseconds, used to stamp asset mutations.
pub fn now_timestamp_ms() -> i64 {
    Local::now().timestamp_millis()
}

/// Compact "how long ago" label for the status bar.
pub fn format_age(ms: i64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    format!("{}h", mins / 60)
}
