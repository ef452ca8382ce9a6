use std::fmt::Write;
use std::sync::Arc;
use colored::Colorize;
use log::info;
use tokio::sync::RwLock;
use crate::cli::{ChatCommand, ClipsCommand, Command, StreamCommand};
use crate::config::Config;
use crate::kick::api::auth;
use crate::kick::api::models::{BanRequest, Category, ChannelStats, ChatMessage, Clip, StreamUpdate, Subscription};
use crate::kick::api::requests::*;
use crate::kick::KickAPIClient;

type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Runs one management subcommand against the authenticated API.
pub async fn execute(command: Command, config: Arc<RwLock<Config>>) -> CommandResult {
    if let Command::Logout = command {
        config.write().await.clear_session()?;
        println!("Logged out.");
        return Ok(());
    }

    config.write().await.prompt_for_credentials()?;
    let api_client = KickAPIClient::new(Arc::clone(&config)).await?;

    if matches!(command, Command::Auth) || !config.read().await.is_authenticated() {
        info!("No stored session, starting authorization");
        let user = auth::login(&api_client).await?;
        println!("Logged in as {}", user.username.bold());
        if matches!(command, Command::Auth) {
            return Ok(());
        }
    }

    match command {
        Command::Me => {
            let user = get_user_info(&api_client).await?;
            println!("{} ({})", user.username.bold(), user.id);
            if let Some(email) = user.email {
                println!("Email: {}", email);
            }
        }
        Command::Channel => {
            let channel = get_channel_info(&api_client).await?;
            println!("{} ({})", channel.name.bold(), channel.slug);
            println!("Id:            {}", channel.id);
            println!("Banned:        {}", yes_no(channel.is_banned));
            println!("VODs:          {}", yes_no(channel.vod_enabled));
            println!("Subscriptions: {}", yes_no(channel.subscription_enabled));
        }
        Command::Stream(StreamCommand::Show) => {
            let channel = get_channel_info(&api_client).await?;
            let stream = get_stream_info(&api_client, &channel.id).await?;
            if stream.is_live {
                println!("{}", "LIVE".green().bold());
            } else {
                println!("{}", "OFFLINE".red().bold());
            }
            println!("Title:    {}", stream.session_title);
            println!("Category: {}", stream.category_name.as_deref().unwrap_or("-"));
            println!("Language: {}", stream.language);
            println!("Viewers:  {}", stream.viewer_count);
            println!("Mature:   {}", yes_no(stream.is_mature));
            if let Some(start) = stream.start_time {
                println!("Started:  {}", start);
            }
        }
        Command::Stream(StreamCommand::Set { title, category_id, language, mature }) => {
            let channel = get_channel_info(&api_client).await?;
            let update = StreamUpdate { title, category_id, is_mature: mature, language };
            let stream = update_stream_info(&api_client, &channel.id, &update).await?;
            println!("Stream updated: {}", stream.session_title);
        }
        Command::Categories { search } => {
            let categories = get_categories(&api_client, search.as_deref()).await?;
            print!("{}", categories_table(&categories));
        }
        Command::Chat(ChatCommand::List) => {
            let channel = get_channel_info(&api_client).await?;
            let messages = get_chat_messages(&api_client, &channel.id).await?;
            print!("{}", chat_table(&messages));
        }
        Command::Chat(ChatCommand::Send { message }) => {
            let channel = get_channel_info(&api_client).await?;
            let sent = send_chat_message(&api_client, &channel.id, &message).await?;
            println!("Sent message {}", sent.id);
        }
        Command::Chat(ChatCommand::Delete { message_id }) => {
            let channel = get_channel_info(&api_client).await?;
            delete_chat_message(&api_client, &channel.id, &message_id).await?;
            println!("Deleted message {}", message_id);
        }
        Command::Ban { user_id, reason, duration } => {
            let channel = get_channel_info(&api_client).await?;
            let ban = BanRequest { user_id, reason, duration };
            ban_user(&api_client, &channel.id, &ban).await?;
            match ban.duration {
                Some(seconds) => println!("User {} timed out for {}s", ban.user_id, seconds),
                None => println!("User {} banned", ban.user_id),
            }
        }
        Command::Unban { user_id } => {
            let channel = get_channel_info(&api_client).await?;
            unban_user(&api_client, &channel.id, &user_id).await?;
            println!("User {} unbanned", user_id);
        }
        Command::Clips(ClipsCommand::List) => {
            let channel = get_channel_info(&api_client).await?;
            let clips = get_clips(&api_client, &channel.id).await?;
            print!("{}", clips_table(&clips));
        }
        Command::Clips(ClipsCommand::Create { title }) => {
            let channel = get_channel_info(&api_client).await?;
            let clip = create_clip(&api_client, &channel.id, &title).await?;
            println!("Created clip {} ({})", clip.title, clip.id);
        }
        Command::Clips(ClipsCommand::Delete { clip_id }) => {
            delete_clip(&api_client, &clip_id).await?;
            println!("Deleted clip {}", clip_id);
        }
        Command::Subs => {
            let channel = get_channel_info(&api_client).await?;
            let subscribers = get_subscribers(&api_client, &channel.id).await?;
            print!("{}", subscribers_table(&subscribers));
        }
        Command::Stats { range } => {
            let channel = get_channel_info(&api_client).await?;
            let stats = get_channel_stats(&api_client, &channel.id, range).await?;
            print!("{}", stats_report(&stats));
        }
        Command::Auth | Command::Logout | Command::Watch { .. } => {}
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Left-aligned text table sized to its widest cell per column.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", header_line.trim_end());
    let _ = writeln!(out, "{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    out
}

pub fn categories_table(categories: &[Category]) -> String {
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| vec![c.id.clone(), c.name.clone(), c.viewers.to_string()])
        .collect();
    format_table(&["ID", "NAME", "VIEWERS"], &rows)
}

pub fn chat_table(messages: &[ChatMessage]) -> String {
    let rows: Vec<Vec<String>> = messages
        .iter()
        .map(|m| vec![m.id.clone(), m.created_at.clone(), m.username.clone(), m.content.clone()])
        .collect();
    format_table(&["ID", "SENT", "USER", "MESSAGE"], &rows)
}

pub fn clips_table(clips: &[Clip]) -> String {
    let rows: Vec<Vec<String>> = clips
        .iter()
        .map(|c| vec![
            c.id.clone(),
            c.title.clone(),
            c.view_count.to_string(),
            c.created_at.clone(),
            c.clip_url.clone().unwrap_or_default(),
        ])
        .collect();
    format_table(&["ID", "TITLE", "VIEWS", "CREATED", "URL"], &rows)
}

pub fn subscribers_table(subscribers: &[Subscription]) -> String {
    let rows: Vec<Vec<String>> = subscribers
        .iter()
        .map(|s| vec![s.username.clone(), format!("Tier {}", s.tier), s.created_at.clone()])
        .collect();
    format_table(&["USER", "TIER", "SINCE"], &rows)
}

pub fn stats_report(stats: &ChannelStats) -> String {
    let mut out = format_table(
        &["METRIC", "VALUE"],
        &[
            vec!["Views".to_string(), stats.views.to_string()],
            vec!["Peak viewers".to_string(), stats.peak_viewers.to_string()],
            vec!["Average viewers".to_string(), stats.average_viewers.to_string()],
            vec!["New followers".to_string(), stats.new_followers.to_string()],
            vec!["New subscribers".to_string(), stats.new_subscribers.to_string()],
            vec!["Chat messages".to_string(), stats.chat_messages.to_string()],
            vec!["Hours streamed".to_string(), format!("{:.1}", stats.hours_streamed)],
            vec!["Clips created".to_string(), stats.clips_created.to_string()],
        ],
    );

    if let Some(demographics) = &stats.viewer_demographics {
        let rows: Vec<Vec<String>> = demographics.age.iter()
            .map(|(bucket, share)| vec![format!("age {}", bucket), format!("{}%", share)])
            .chain(demographics.gender.iter().map(|(gender, share)| vec![gender.clone(), format!("{}%", share)]))
            .collect();
        out.push('\n');
        out.push_str(&format_table(&["AUDIENCE", "SHARE"], &rows));
    }

    if let Some(countries) = &stats.top_countries {
        let rows: Vec<Vec<String>> = countries
            .iter()
            .map(|(country, share)| vec![country.clone(), share.viewers.to_string(), format!("{}%", share.percentage)])
            .collect();
        out.push('\n');
        out.push_str(&format_table(&["COUNTRY", "VIEWERS", "SHARE"], &rows));
    }
    out
}
