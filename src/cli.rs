use std::path::PathBuf;
use clap::{Parser, Subcommand};
use crate::config::Config;
use crate::kick::api::models::StatsRange;
use crate::logging::LogLevel;

#[derive(Debug, Parser)]
#[command(name = "kickwatch", version, about = "Watch and manage a Kick channel from the terminal")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = Config::CONFIG_PATH)]
    pub config: PathBuf,

    /// Overrides the configured log level
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll a channel and show live stats with simulated audience activity
    Watch {
        /// Channel slug, defaults to the configured channel
        #[arg(long)]
        channel: Option<String>,
        /// Seed for the audience simulation
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Log in through the browser and store the tokens
    Auth,
    /// Forget stored tokens
    Logout,
    /// Show the logged-in user
    Me,
    /// Show your channel
    Channel,
    #[command(subcommand)]
    Stream(StreamCommand),
    /// List stream categories
    Categories {
        #[arg(long)]
        search: Option<String>,
    },
    #[command(subcommand)]
    Chat(ChatCommand),
    /// Ban or time out a user
    Ban {
        user_id: String,
        #[arg(long, default_value = "")]
        reason: String,
        /// Timeout in seconds; omit for a permanent ban
        #[arg(long)]
        duration: Option<u64>,
    },
    /// Lift a ban
    Unban { user_id: String },
    #[command(subcommand)]
    Clips(ClipsCommand),
    /// List subscribers
    Subs,
    /// Show channel statistics
    Stats {
        #[arg(long, value_enum, default_value = "day")]
        range: StatsRange,
    },
}

#[derive(Debug, Subcommand)]
pub enum StreamCommand {
    /// Show the current stream settings
    Show,
    /// Update title, category, language and mature flag
    Set {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category_id: String,
        #[arg(long, default_value = "pt")]
        language: String,
        #[arg(long)]
        mature: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    /// Show recent chat messages
    List,
    /// Send a chat message
    Send { message: String },
    /// Delete a chat message
    Delete { message_id: String },
}

#[derive(Debug, Subcommand)]
pub enum ClipsCommand {
    /// List clips
    List,
    /// Create a clip
    Create { title: String },
    /// Delete a clip
    Delete { clip_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_watch_with_overrides() {
        let cli = Cli::parse_from(["kickwatch", "--log-level", "debug", "watch", "--channel", "abc", "--seed", "9"]);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.config, PathBuf::from(Config::CONFIG_PATH));
        match cli.command {
            Command::Watch { channel, seed } => {
                assert_eq!(channel.as_deref(), Some("abc"));
                assert_eq!(seed, Some(9));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn ban_without_duration_is_permanent() {
        let cli = Cli::parse_from(["kickwatch", "ban", "42", "--reason", "spam"]);
        match cli.command {
            Command::Ban { user_id, reason, duration } => {
                assert_eq!(user_id, "42");
                assert_eq!(reason, "spam");
                assert_eq!(duration, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn stats_range_defaults_to_day() {
        let cli = Cli::parse_from(["kickwatch", "stats"]);
        assert!(matches!(cli.command, Command::Stats { range: StatsRange::Day }));
    }
}
