use std::fmt::Write;
use colored::{ColoredString, Colorize};
use crate::dashboard::state::StatsSnapshot;
use crate::kick::api::models::PublicChannel;
use crate::simulation::{ChatRole, SimulatedMessage, ViewerSnapshot};

pub const NO_VIEWERS: &str = "No viewers available.";
pub const CHAT_PLACEHOLDER: &str = "Chat will appear here while the channel is live.";

fn heading(title: &str) -> ColoredString {
    format!("== {} ==", title).bold()
}

pub fn role_colored(message: &SimulatedMessage) -> ColoredString {
    let name = format!("{}:", message.username);
    match message.role {
        ChatRole::Moderator => name.purple().bold(),
        ChatRole::Subscriber => name.green().bold(),
        ChatRole::Donator => name.yellow().bold(),
        ChatRole::Normal => name.white().bold(),
    }
}

pub fn render_channel(channel: &PublicChannel, stream_time: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading("Channel"));
    let _ = writeln!(out, "Channel:   {}", channel.user.username.bold());
    let status = if channel.is_live() { "LIVE".green().bold() } else { "OFFLINE".red().bold() };
    let _ = writeln!(out, "Status:    {}", status);
    let _ = writeln!(out, "Followers: {}", channel.followers_count);

    if let Some(stream) = &channel.livestream {
        let categories = stream.categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ");
        let _ = writeln!(out, "Viewers:   {}", stream.viewer_count);
        let _ = writeln!(out, "Title:     {}", stream.session_title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled"));
        let _ = writeln!(out, "Uptime:    {}", stream_time);
        let _ = writeln!(out, "Category:  {}", if categories.is_empty() { "Uncategorised" } else { categories.as_str() });
        if let Some(thumbnail) = &stream.thumbnail {
            let _ = writeln!(out, "Thumbnail: {}", thumbnail.url);
        }
    }

    if let Some(bio) = channel.user.bio.as_deref().filter(|bio| !bio.is_empty()) {
        let _ = writeln!(out, "Bio:       {}", bio.dimmed());
    }
    out
}

pub fn render_viewers(viewers: &[ViewerSnapshot]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", heading("Viewers"), viewers.len());
    if viewers.is_empty() {
        let _ = writeln!(out, "{}", NO_VIEWERS.dimmed());
        return out;
    }
    let width = viewers.iter().map(|v| v.username.len()).max().unwrap_or(0);
    for viewer in viewers {
        let initial = viewer.username.chars().next().map(|c| c.to_ascii_uppercase()).unwrap_or('?');
        let _ = writeln!(
            out,
            "[{}] {:<width$}  {}",
            initial.to_string().green(),
            viewer.username,
            viewer.duration.dimmed(),
            width = width
        );
    }
    out
}

pub fn render_chat(messages: &[SimulatedMessage]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading("Chat"));
    if messages.is_empty() {
        let _ = writeln!(out, "{}", CHAT_PLACEHOLDER.dimmed());
        return out;
    }
    for message in messages {
        let _ = writeln!(out, "{} {} {}", message.timestamp.dimmed(), role_colored(message), message.text);
    }
    out
}

pub fn render_stats(stats: &StatsSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading("Stats"));
    let _ = writeln!(out, "Peak viewers:  {}", stats.peak_viewers);
    let _ = writeln!(out, "Messages:      {}", stats.total_messages);
    let _ = writeln!(out, "New followers: {}", stats.new_followers);
    let _ = writeln!(out, "Stream time:   {}", stats.stream_time);
    out
}

pub fn render_error(message: &str) -> String {
    format!("{}\n", message.red())
}
