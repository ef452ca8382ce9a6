use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Formats elapsed time as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_duration(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    let (hours, minutes, seconds) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Formats how long a viewer has been watching: `45min` or `2h 5min`.
pub fn format_viewer_duration(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    if minutes < 60 {
        format!("{}min", minutes)
    } else {
        format!("{}h {}min", minutes / 60, minutes % 60)
    }
}

/// Kick returns both RFC 3339 and bare `YYYY-MM-DD HH:MM:SS` (UTC) timestamps.
pub fn parse_kick_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
