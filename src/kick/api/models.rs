use std::collections::BTreeMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kick is inconsistent about ids: some endpoints send numbers, some strings.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number id, got {}", other))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub playback_url: Option<String>,
    #[serde(default)]
    pub vod_enabled: bool,
    #[serde(default)]
    pub subscription_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub channel_id: String,
    #[serde(default)]
    pub session_title: String,
    pub is_live: bool,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub is_mature: bool,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamUpdate {
    pub title: String,
    pub category_id: String,
    pub is_mature: bool,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub channel_id: String,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    pub username: String,
    pub tier: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub channel_id: String,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    pub title: String,
    pub created_at: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub clip_url: Option<String>,
}

/// `duration` is in seconds; `None` bans permanently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanRequest {
    pub user_id: String,
    pub reason: String,
    pub duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub viewers: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatsRange {
    Day,
    Week,
    Month,
}

impl StatsRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsRange::Day => "day",
            StatsRange::Week => "week",
            StatsRange::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerDemographics {
    pub age: BTreeMap<String, f64>,
    pub gender: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryShare {
    pub viewers: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelStats {
    pub views: u64,
    pub peak_viewers: u64,
    pub average_viewers: u64,
    pub new_followers: u64,
    pub new_subscribers: u64,
    pub chat_messages: u64,
    pub hours_streamed: f64,
    pub clips_created: u64,
    pub viewer_demographics: Option<ViewerDemographics>,
    pub top_countries: Option<BTreeMap<String, CountryShare>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// Public, unauthenticated channel lookup.

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublicChannel {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "followersCount", alias = "followers_count", default)]
    pub followers_count: u64,
    pub user: PublicUser,
    #[serde(default)]
    pub livestream: Option<Livestream>,
}

impl PublicChannel {
    pub fn is_live(&self) -> bool {
        self.livestream.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublicUser {
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Livestream {
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub session_title: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}
