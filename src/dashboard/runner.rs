use std::future::Future;
use chrono::Local;
use log::{error, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use crate::config::PollIntervals;
use crate::dashboard::manager::Dashboard;
use crate::dashboard::render::{render_channel, render_chat, render_error, render_stats, render_viewers};
use crate::kick::ChannelSource;

/// Keyboard commands read from stdin while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Quit,
    Unknown,
}

pub fn parse_control(line: &str) -> Control {
    match line.trim().to_lowercase().as_str() {
        "p" | "pause" | "resume" => Control::TogglePause,
        "q" | "quit" | "exit" => Control::Quit,
        _ => Control::Unknown,
    }
}

/// Drives the dashboard from four timers on the current task until `shutdown`
/// resolves or `q` is read from `controls`.
///
/// The channel timer fires immediately; the others wait one full period,
/// so the first simulated output follows the first channel lookup.
pub async fn run_dashboard<C, S>(
    dashboard: &mut Dashboard,
    source: &dyn ChannelSource,
    intervals: &PollIntervals,
    controls: C,
    shutdown: S,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    C: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut channel_timer = interval(intervals.channel());
    let mut viewers_timer = interval_at(Instant::now() + intervals.viewers(), intervals.viewers());
    let mut chat_timer = interval_at(Instant::now() + intervals.chat(), intervals.chat());
    let mut stats_timer = interval_at(Instant::now() + intervals.stats(), intervals.stats());
    for timer in [&mut channel_timer, &mut viewers_timer, &mut chat_timer, &mut stats_timer] {
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    }

    let mut controls = controls.lines();
    let mut controls_open = true;
    tokio::pin!(shutdown);

    info!("Watching {}. Type 'p' + Enter to pause/resume chat, 'q' to quit.", dashboard.channel_slug());

    loop {
        tokio::select! {
            _ = channel_timer.tick() => {
                let now = Local::now();
                // a slow lookup must not hold off shutdown
                let fetched = tokio::select! {
                    result = dashboard.refresh_channel(source, now) => result.map(|channel| channel.clone()),
                    _ = &mut shutdown => {
                        info!("Shutdown requested during channel lookup.");
                        break;
                    }
                };
                match fetched {
                    Ok(channel) => {
                        print!("{}", render_channel(&channel, &dashboard.stats().stream_time(now)));
                    }
                    Err(e) => {
                        error!("Failed to fetch channel info: {}", e);
                        print!("{}", render_error(&format!("Failed to fetch channel info: {}", e)));
                    }
                }
            }
            _ = viewers_timer.tick() => {
                match dashboard.update_viewers(Local::now()) {
                    Ok(update) => print!("{}", render_viewers(&update.viewers)),
                    Err(e) => error!("Failed to update viewers: {}", e),
                }
            }
            _ = chat_timer.tick() => {
                match dashboard.update_chat(Local::now()) {
                    Ok(Some(log)) if !log.is_empty() => print!("{}", render_chat(&log)),
                    Ok(_) => {}
                    Err(e) => error!("Failed to update chat: {}", e),
                }
            }
            _ = stats_timer.tick() => {
                print!("{}", render_stats(&dashboard.update_stats(Local::now())));
            }
            line = controls.next_line(), if controls_open => {
                match line {
                    Ok(Some(line)) => match parse_control(&line) {
                        Control::TogglePause => {
                            dashboard.toggle_chat_pause();
                        }
                        Control::Quit => {
                            info!("Quit requested, shutting down.");
                            break;
                        }
                        Control::Unknown => warn!("Unknown command: {:?}", line.trim()),
                    },
                    Ok(None) => controls_open = false,
                    Err(e) => {
                        warn!("Stopped reading controls: {}", e);
                        controls_open = false;
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested.");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use async_trait::async_trait;
    use crate::config::SimulationSettings;
    use crate::kick::api::models::PublicChannel;
    use crate::kick::ApiError;
    use crate::simulation::RngSource;

    struct Stalled;

    #[async_trait]
    impl ChannelSource for Stalled {
        async fn fetch_channel(&self, _slug: &str) -> Result<PublicChannel, ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn shutdown_interrupts_a_stalled_channel_lookup() {
        let mut dashboard =
            Dashboard::new("streamer", &SimulationSettings::default(), Box::new(RngSource::seeded(1))).unwrap();
        let shutdown = tokio::time::sleep(Duration::from_millis(50));

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            run_dashboard(&mut dashboard, &Stalled, &PollIntervals::default(), tokio::io::empty(), shutdown),
        )
        .await;
        assert!(finished.is_ok());
    }

    struct Offline;

    #[async_trait]
    impl ChannelSource for Offline {
        async fn fetch_channel(&self, _slug: &str) -> Result<PublicChannel, ApiError> {
            Err(ApiError::MissingCredential("offline"))
        }
    }

    #[tokio::test]
    async fn quit_line_stops_the_loop() {
        let mut dashboard =
            Dashboard::new("streamer", &SimulationSettings::default(), Box::new(RngSource::seeded(2))).unwrap();

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            run_dashboard(&mut dashboard, &Offline, &PollIntervals::default(), &b"q\n"[..], std::future::pending()),
        )
        .await;
        assert!(finished.is_ok());
    }

    #[test]
    fn controls_parse_loosely() {
        assert_eq!(parse_control("p\n"), Control::TogglePause);
        assert_eq!(parse_control(" Resume "), Control::TogglePause);
        assert_eq!(parse_control("Q"), Control::Quit);
        assert_eq!(parse_control("exit"), Control::Quit);
        assert_eq!(parse_control("hello"), Control::Unknown);
    }
}
