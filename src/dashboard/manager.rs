use std::collections::HashSet;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use crate::config::SimulationSettings;
use crate::dashboard::state::{DashboardStats, StatsSnapshot};
use crate::kick::api::models::PublicChannel;
use crate::kick::{ApiError, ChannelSource};
use crate::simulation::{
    ChatLog, RandomSource, SimulatedMessage, SimulationError, ViewerRoster, ViewerSnapshot,
};
use crate::utils::parse_kick_timestamp;

/// Result of a viewer refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerUpdate {
    pub viewers: Vec<ViewerSnapshot>,
    pub new_peak: bool,
}

/// Owns everything the watch screen shows: the last channel lookup, both
/// simulators and the derived stats. Each `update_*` call is one timer tick.
pub struct Dashboard {
    channel_slug: String,
    channel: Option<PublicChannel>,
    roster: ViewerRoster,
    chat: ChatLog,
    stats: DashboardStats,
    viewer_names: Vec<String>,
    message_templates: Vec<String>,
    rng: Box<dyn RandomSource + Send>,
}

impl Dashboard {
    pub fn new(
        channel_slug: impl Into<String>,
        settings: &SimulationSettings,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self, SimulationError> {
        if settings.viewer_names.is_empty() {
            return Err(SimulationError::EmptyCandidatePool);
        }
        if settings.message_templates.is_empty() {
            return Err(SimulationError::EmptyTemplateCatalog);
        }

        let mut viewer_names = settings.viewer_names.clone();
        let mut seen = HashSet::new();
        viewer_names.retain(|name| seen.insert(name.clone()));
        if viewer_names.len() < settings.viewer_names.len() {
            warn!(
                "Ignoring {} repeated viewer name(s) in the simulation settings",
                settings.viewer_names.len() - viewer_names.len()
            );
        }

        Ok(Self {
            channel_slug: channel_slug.into(),
            channel: None,
            roster: ViewerRoster::new(),
            chat: ChatLog::default(),
            stats: DashboardStats::default(),
            viewer_names,
            message_templates: settings.message_templates.clone(),
            rng,
        })
    }

    pub fn channel_slug(&self) -> &str {
        &self.channel_slug
    }

    pub fn channel(&self) -> Option<&PublicChannel> {
        self.channel.as_ref()
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn is_live(&self) -> bool {
        self.stats.live
    }

    /// Fetches the channel and applies it. On failure the previous state is kept.
    pub async fn refresh_channel(
        &mut self,
        source: &dyn ChannelSource,
        now: DateTime<Local>,
    ) -> Result<&PublicChannel, ApiError> {
        let channel = source.fetch_channel(&self.channel_slug).await?;
        Ok(self.apply_channel(channel, now))
    }

    pub fn apply_channel(&mut self, channel: PublicChannel, now: DateTime<Local>) -> &PublicChannel {
        let was_live = self.stats.live;
        self.stats.live = channel.is_live();

        match &channel.livestream {
            Some(stream) => {
                if self.stats.stream_start.is_none() {
                    let start = parse_kick_timestamp(&stream.created_at)
                        .map(|start| start.with_timezone(&Local))
                        .unwrap_or_else(|| {
                            warn!("Unrecognised stream start time {:?}, counting from now", stream.created_at);
                            now
                        });
                    self.stats.stream_start = Some(start);
                }
                if !was_live {
                    info!("{} is live: {}", channel.user.username, stream.session_title.as_deref().unwrap_or(""));
                }
            }
            None => {
                self.stats.stream_start = None;
                if was_live {
                    info!("{} went offline", channel.user.username);
                }
            }
        }

        self.channel.insert(channel)
    }

    pub fn update_viewers(&mut self, now: DateTime<Local>) -> Result<ViewerUpdate, SimulationError> {
        if self.channel.is_none() {
            return Ok(ViewerUpdate { viewers: Vec::new(), new_peak: false });
        }

        let viewers = self.roster.tick(self.stats.live, &self.viewer_names, now, self.rng.as_mut())?;
        let new_peak = self.stats.record_viewer_count(viewers.len());
        if new_peak {
            debug!("New peak viewer count: {}", viewers.len());
        }
        Ok(ViewerUpdate { viewers, new_peak })
    }

    /// Returns `None` while the chat is paused or before the first channel lookup.
    pub fn update_chat(&mut self, now: DateTime<Local>) -> Result<Option<Vec<SimulatedMessage>>, SimulationError> {
        if self.channel.is_none() || self.stats.chat_paused {
            return Ok(None);
        }

        let tick = self.chat.tick(
            self.stats.live,
            &self.message_templates,
            &self.viewer_names,
            now,
            self.rng.as_mut(),
        )?;
        self.stats.total_messages += tick.new_messages as u64;
        if tick.new_follower {
            self.stats.new_followers += 1;
        }
        Ok(Some(tick.log))
    }

    pub fn update_stats(&self, now: DateTime<Local>) -> StatsSnapshot {
        self.stats.snapshot(now)
    }

    pub fn toggle_chat_pause(&mut self) -> bool {
        self.stats.chat_paused = !self.stats.chat_paused;
        info!("Chat {}", if self.stats.chat_paused { "paused" } else { "resumed" });
        self.stats.chat_paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use reqwest::StatusCode;
    use crate::kick::api::models::{Livestream, PublicUser};
    use crate::simulation::{RngSource, CHAT_HISTORY_LIMIT};

    struct FakeSource {
        responses: Mutex<VecDeque<Result<PublicChannel, ApiError>>>,
    }

    impl FakeSource {
        fn new(responses: Vec<Result<PublicChannel, ApiError>>) -> Self {
            Self { responses: Mutex::new(responses.into()) }
        }
    }

    #[async_trait]
    impl ChannelSource for FakeSource {
        async fn fetch_channel(&self, _slug: &str) -> Result<PublicChannel, ApiError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::MissingCredential("no more responses")))
        }
    }

    fn channel(live_since: Option<&str>) -> PublicChannel {
        PublicChannel {
            id: "1".to_string(),
            followers_count: 100,
            user: PublicUser { username: "streamer".to_string(), bio: None },
            livestream: live_since.map(|created_at| Livestream {
                viewer_count: 20,
                session_title: Some("testing".to_string()),
                created_at: created_at.to_string(),
                categories: Vec::new(),
                thumbnail: None,
            }),
        }
    }

    fn dashboard(seed: u64) -> Dashboard {
        Dashboard::new("streamer", &SimulationSettings::default(), Box::new(RngSource::seeded(seed))).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap().with_timezone(&Local)
    }

    #[test]
    fn repeated_viewer_names_are_collapsed() {
        let settings = SimulationSettings {
            viewer_names: ["a", "b", "a", "c", "b"].iter().map(|s| s.to_string()).collect(),
            ..SimulationSettings::default()
        };
        let dash = Dashboard::new("streamer", &settings, Box::new(RngSource::seeded(1))).unwrap();
        assert_eq!(dash.viewer_names, vec!["a", "b", "c"]);
    }

    #[test]
    fn nothing_happens_before_first_lookup() {
        let mut dash = dashboard(1);
        assert!(dash.update_viewers(at(12, 0)).unwrap().viewers.is_empty());
        assert_eq!(dash.update_chat(at(12, 0)).unwrap(), None);
        assert_eq!(dash.stats().total_messages, 0);
    }

    #[test]
    fn offline_channel_produces_empty_output() {
        let mut dash = dashboard(2);
        dash.apply_channel(channel(None), at(12, 0));
        assert!(!dash.is_live());
        assert!(dash.update_viewers(at(12, 0)).unwrap().viewers.is_empty());
        assert_eq!(dash.update_chat(at(12, 0)).unwrap(), Some(Vec::new()));
        assert_eq!(dash.update_stats(at(12, 0)).stream_time, "00:00:00");
    }

    #[test]
    fn stream_start_is_set_once_per_session() {
        let mut dash = dashboard(3);
        dash.apply_channel(channel(Some("2024-03-01 10:00:00")), at(12, 0));
        let first = dash.stats().stream_start;
        assert_eq!(dash.update_stats(at(12, 0)).stream_time, "02:00:00");

        dash.apply_channel(channel(Some("2024-03-01 11:00:00")), at(12, 5));
        assert_eq!(dash.stats().stream_start, first);

        dash.apply_channel(channel(None), at(12, 10));
        assert_eq!(dash.stats().stream_start, None);

        dash.apply_channel(channel(Some("2024-03-01 13:00:00")), at(13, 30));
        assert_eq!(dash.update_stats(at(13, 30)).stream_time, "00:30:00");
    }

    #[test]
    fn unparseable_start_counts_from_now() {
        let mut dash = dashboard(4);
        dash.apply_channel(channel(Some("soon")), at(12, 0));
        assert_eq!(dash.update_stats(at(12, 0) + Duration::minutes(1)).stream_time, "00:01:00");
    }

    #[test]
    fn live_ticks_feed_the_counters() {
        let mut dash = dashboard(5);
        dash.apply_channel(channel(Some("2024-03-01 10:00:00")), at(12, 0));

        let update = dash.update_viewers(at(12, 0)).unwrap();
        assert!(update.new_peak);
        assert!(update.viewers.len() >= 8);
        assert_eq!(dash.stats().peak_viewers, update.viewers.len());

        let mut produced = 0;
        for _ in 0..40 {
            let log = dash.update_chat(at(12, 1)).unwrap().unwrap();
            assert!(log.len() <= CHAT_HISTORY_LIMIT);
            produced = log.len();
        }
        assert_eq!(produced, CHAT_HISTORY_LIMIT);
        assert!(dash.stats().total_messages >= 40);
        assert!(dash.stats().total_messages <= 80);
    }

    #[test]
    fn paused_chat_is_frozen() {
        let mut dash = dashboard(6);
        dash.apply_channel(channel(Some("2024-03-01 10:00:00")), at(12, 0));
        dash.update_chat(at(12, 0)).unwrap();
        let count = dash.stats().total_messages;

        assert!(dash.toggle_chat_pause());
        assert_eq!(dash.update_chat(at(12, 1)).unwrap(), None);
        assert_eq!(dash.stats().total_messages, count);

        assert!(!dash.toggle_chat_pause());
        assert!(dash.update_chat(at(12, 2)).unwrap().is_some());
    }

    #[test]
    fn empty_settings_fail_fast() {
        let settings = SimulationSettings { viewer_names: Vec::new(), ..Default::default() };
        let result = Dashboard::new("x", &settings, Box::new(RngSource::seeded(0)));
        assert!(matches!(result, Err(SimulationError::EmptyCandidatePool)));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_state() {
        let source = FakeSource::new(vec![
            Ok(channel(Some("2024-03-01 10:00:00"))),
            Err(ApiError::Status { status: StatusCode::BAD_GATEWAY, message: "upstream".to_string() }),
        ]);
        let mut dash = dashboard(7);

        assert!(dash.refresh_channel(&source, at(12, 0)).await.unwrap().is_live());
        let err = dash.refresh_channel(&source, at(12, 1)).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(dash.is_live());
        assert!(dash.stats().stream_start.is_some());
    }
}
