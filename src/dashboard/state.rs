use chrono::{DateTime, Local};
use serde::Serialize;
use crate::utils::format_duration;

/// Counters and flags derived from the channel and simulator ticks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub live: bool,
    pub stream_start: Option<DateTime<Local>>,
    pub peak_viewers: usize,
    pub total_messages: u64,
    pub new_followers: u64,
    pub chat_paused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub peak_viewers: usize,
    pub total_messages: u64,
    pub new_followers: u64,
    pub stream_time: String,
}

impl DashboardStats {
    /// Raises the peak if `count` beats it. Returns whether it moved.
    pub fn record_viewer_count(&mut self, count: usize) -> bool {
        if count > self.peak_viewers {
            self.peak_viewers = count;
            true
        } else {
            false
        }
    }

    pub fn stream_time(&self, now: DateTime<Local>) -> String {
        match self.stream_start {
            Some(start) => format_duration(now.signed_duration_since(start)),
            None => format_duration(chrono::Duration::zero()),
        }
    }

    pub fn snapshot(&self, now: DateTime<Local>) -> StatsSnapshot {
        StatsSnapshot {
            peak_viewers: self.peak_viewers,
            total_messages: self.total_messages,
            new_followers: self.new_followers,
            stream_time: self.stream_time(now),
        }
    }
}
