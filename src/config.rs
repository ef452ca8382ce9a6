use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::kick::api::models::User;
use crate::logging::LogLevel;
use crate::simulation::{default_message_templates, default_viewer_names};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Missing config value: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollIntervals {
    pub channel_secs: u64,
    pub viewers_secs: u64,
    pub chat_secs: u64,
    pub stats_secs: u64,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            channel_secs: 60,
            viewers_secs: 15,
            chat_secs: 3,
            stats_secs: 5,
        }
    }
}

impl PollIntervals {
    pub fn channel(&self) -> Duration {
        Duration::from_secs(self.channel_secs.max(1))
    }

    pub fn viewers(&self) -> Duration {
        Duration::from_secs(self.viewers_secs.max(1))
    }

    pub fn chat(&self) -> Duration {
        Duration::from_secs(self.chat_secs.max(1))
    }

    pub fn stats(&self) -> Duration {
        Duration::from_secs(self.stats_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub viewer_names: Vec<String>,
    pub message_templates: Vec<String>,
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            viewer_names: default_viewer_names(),
            message_templates: default_message_templates(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub channel: Option<String>,
    pub public_api_url: String,
    pub api_url: String,
    pub oauth_authorize_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    pub redirect_port: u16,
    pub request_timeout_secs: u64,
    pub log_level: LogLevel,
    pub intervals: PollIntervals,
    pub simulation: SimulationSettings,
    #[serde(skip)]
    path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: None,
            public_api_url: "https://kick.com/api/v1".to_string(),
            api_url: "https://api.kick.com/v1".to_string(),
            oauth_authorize_url: "https://kick.com/oauth/authorize".to_string(),
            client_id: None,
            client_secret: None,
            access_token: None,
            refresh_token: None,
            user: None,
            redirect_port: 3000,
            request_timeout_secs: 10,
            log_level: LogLevel::Info,
            intervals: PollIntervals::default(),
            simulation: SimulationSettings::default(),
            path: PathBuf::from(Self::CONFIG_PATH),
        }
    }
}

impl Config {
    pub const CONFIG_PATH: &'static str = "kickwatch.toml";

    /// Reads the config at `path`, falling back to defaults when the file is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            toml::from_str::<Config>(&fs::read_to_string(path)?)?
        } else {
            Config::default()
        };
        config.path = path.to_path_buf();
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a config file exists at this config's path.
    pub fn is_persisted(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let toml = toml::to_string(self)?;
        fs::write(&self.path, toml)?;
        info!("Config saved to: {:?}", self.path);
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }

    pub fn require_channel(&self) -> Result<&str, ConfigError> {
        self.channel.as_deref().filter(|c| !c.is_empty()).ok_or(ConfigError::MissingField("channel"))
    }

    pub fn is_api_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn set_tokens(&mut self, access_token: String, refresh_token: Option<String>) -> Result<(), ConfigError> {
        self.access_token = Some(access_token);
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        self.save()
    }

    pub fn set_user(&mut self, user: User) -> Result<(), ConfigError> {
        self.user = Some(user);
        self.save()
    }

    /// Forgets the session: tokens and cached user. Client credentials stay.
    pub fn clear_session(&mut self) -> Result<(), ConfigError> {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        self.save()
    }

    /// Asks for whichever client credentials are still missing and saves them.
    pub fn prompt_for_credentials(&mut self) -> Result<(), ConfigError> {
        if self.client_id.is_some() && self.client_secret.is_some() {
            return Ok(());
        }

        println!("To use the management commands you need a Kick application.");
        println!("1. Go to https://kick.com/settings/developer");
        println!("2. Create a new application");
        println!("3. Set the redirect URL to: {}", self.redirect_uri());
        println!("4. Copy the Client ID and Client Secret");

        if self.client_id.is_none() {
            let client_id = Self::prompt_input("Enter your Kick Client ID: ")?;
            if client_id.is_empty() {
                return Err(ConfigError::MissingField("client_id"));
            }
            self.client_id = Some(client_id);
        }
        if self.client_secret.is_none() {
            let secret = rpassword::prompt_password("Enter your Kick Client Secret: ")?;
            let secret = secret.trim().to_string();
            if secret.is_empty() {
                return Err(ConfigError::MissingField("client_secret"));
            }
            self.client_secret = Some(secret);
        }

        self.save()
    }

    fn prompt_input(prompt: &str) -> Result<String, ConfigError> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}
