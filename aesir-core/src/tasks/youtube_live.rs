// File: aesir-core/src/tasks/youtube_live.rs

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use async_trait::async_trait;
use futures_util::FutureExt;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use aesir_common::models::ConfigSnapshot;
use aesir_common::traits::{LiveStatusSource, ScheduledTask, Scheduler, TaskHandle};
use crate::config::ConfigHandle;
use crate::http::HttpClient;
use crate::services::message_sender::MessageSender;
use crate::Error;

pub const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Present in a search result only while the video is an active broadcast.
pub const LIVE_MARKER: &str = r#""liveBroadcastContent":"live""#;

/// Asks the YouTube Data API whether a channel has a live video right now.
pub struct YouTubeLiveChecker {
    client: Arc<dyn HttpClient>,
}

impl YouTubeLiveChecker {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    pub fn search_url(api_key: &str, channel_id: &str) -> String {
        format!(
            "{}?part=snippet&channelId={}&type=video&eventType=live&key={}",
            YOUTUBE_SEARCH_URL,
            urlencoding::encode(channel_id),
            urlencoding::encode(api_key),
        )
    }

    /// The API pretty-prints its JSON, so whitespace is dropped before
    /// looking for the marker.
    pub fn body_indicates_live(body: &str) -> bool {
        let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        compact.contains(LIVE_MARKER)
    }
}

#[async_trait]
impl LiveStatusSource for YouTubeLiveChecker {
    async fn is_live(&self, api_key: &str, channel_id: &str) -> bool {
        let url = Self::search_url(api_key, channel_id);
        let response = match self.client.get(url, HashMap::new()).await {
            Ok(r) => r,
            Err(e) => {
                error!("Error checking YouTube live status for channel {}: {}", channel_id, e);
                return false;
            }
        };
        if !response.is_success() {
            error!(
                "Error checking YouTube live status for channel {}: HTTP {} body={}",
                channel_id, response.status, response.body
            );
            return false;
        }
        Self::body_indicates_live(&response.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveState {
    NotLive,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveTransition {
    WentLive,
    WentOffline,
    Unchanged,
}

impl LiveState {
    /// Feeds one observation into the state machine.
    pub fn observe(self, currently_live: bool) -> (LiveState, LiveTransition) {
        match (self, currently_live) {
            (LiveState::NotLive, true) => (LiveState::Live, LiveTransition::WentLive),
            (LiveState::Live, false) => (LiveState::NotLive, LiveTransition::WentOffline),
            (state, _) => (state, LiveTransition::Unchanged),
        }
    }
}

/// Polls a [`LiveStatusSource`] and announces the stream to every player
/// once per offline-to-live transition.
pub struct LiveStatusPoller {
    config: ConfigHandle,
    source: Arc<dyn LiveStatusSource>,
    sender: Arc<MessageSender>,
    state: Mutex<LiveState>,
    timer: Mutex<Option<Box<dyn TaskHandle>>>,
}

impl LiveStatusPoller {
    pub fn new(
        config: ConfigHandle,
        source: Arc<dyn LiveStatusSource>,
        sender: Arc<MessageSender>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            source,
            sender,
            state: Mutex::new(LiveState::NotLive),
            timer: Mutex::new(None),
        })
    }

    pub fn state(&self) -> LiveState {
        *self.state.lock()
    }

    pub fn is_live(&self) -> bool {
        self.state() == LiveState::Live
    }

    /// One poll. Never fails; an unreachable API reads as "not live".
    pub async fn tick(&self) -> LiveTransition {
        let snapshot = self.config.load_full();
        let currently_live = if snapshot.has_youtube_credentials() {
            self.source
                .is_live(&snapshot.youtube_api_key, &snapshot.youtube_channel_id)
                .await
        } else {
            debug!("YouTube credentials not configured, treating channel as offline");
            false
        };

        let transition = {
            let mut state = self.state.lock();
            let (next, transition) = state.observe(currently_live);
            *state = next;
            transition
        };

        match transition {
            LiveTransition::WentLive => self.announce_live(&snapshot),
            LiveTransition::WentOffline => {
                info!("YouTube channel {} is no longer live", snapshot.youtube_channel_id);
            }
            LiveTransition::Unchanged => {}
        }
        transition
    }

    fn announce_live(&self, snapshot: &ConfigSnapshot) {
        self.sender.broadcast_messages(snapshot, &snapshot.live_stream_url());
        info!("Broadcasting YouTube live event to players.");
    }

    /// Starts polling at the interval current right now. Reloading the
    /// config later does not change the period of this timer.
    pub fn start(self: &Arc<Self>, scheduler: &dyn Scheduler) -> Result<(), Error> {
        let mut timer = self.timer.lock();
        if timer.is_some() {
            warn!("YouTube live checker already started");
            return Ok(());
        }
        let period = self.config.load().youtube_check_interval();
        *timer = Some(scheduler.repeat(period, self.timer_task())?);
        info!("YouTube live checker polling every {:?}", period);
        Ok(())
    }

    pub fn stop(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.cancel();
            debug!("YouTube live checker stopped");
        }
    }

    fn timer_task(self: &Arc<Self>) -> ScheduledTask {
        let weak: Weak<Self> = Arc::downgrade(self);
        Arc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(poller) = weak.upgrade() {
                    poller.tick().await;
                }
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::new_config_handle;
    use crate::render::PlainTextRenderer;
    use crate::test_utils::helpers::{RecordingSink, ScriptedLiveSource};

    #[test]
    fn test_observe_is_edge_triggered() {
        let observations = [false, true, true, false, true];
        let mut state = LiveState::NotLive;
        let mut went_live = Vec::new();
        for (idx, live) in observations.iter().enumerate() {
            let (next, transition) = state.observe(*live);
            if transition == LiveTransition::WentLive {
                went_live.push(idx);
            }
            state = next;
        }
        assert_eq!(went_live, vec![1, 4]);
        assert_eq!(state, LiveState::Live);
    }

    #[test]
    fn test_going_offline_is_reported_once() {
        let (s, t) = LiveState::Live.observe(false);
        assert_eq!((s, t), (LiveState::NotLive, LiveTransition::WentOffline));
        let (s, t) = s.observe(false);
        assert_eq!((s, t), (LiveState::NotLive, LiveTransition::Unchanged));
    }

    #[test]
    fn test_marker_detection_ignores_whitespace() {
        let pretty = r#"{ "items": [ { "snippet": { "liveBroadcastContent": "live" } } ] }"#;
        assert!(YouTubeLiveChecker::body_indicates_live(pretty));
        let compact = r#"{"items":[{"snippet":{"liveBroadcastContent":"live"}}]}"#;
        assert!(YouTubeLiveChecker::body_indicates_live(compact));
        let upcoming = r#"{"items":[{"snippet":{"liveBroadcastContent":"upcoming"}}]}"#;
        assert!(!YouTubeLiveChecker::body_indicates_live(upcoming));
        assert!(!YouTubeLiveChecker::body_indicates_live(r#"{"items":[]}"#));
    }

    #[test]
    fn test_search_url_encodes_parameters() {
        let url = YouTubeLiveChecker::search_url("k&y", "UC 1");
        assert_eq!(
            url,
            "https://www.googleapis.com/youtube/v3/search?part=snippet&channelId=UC%201&type=video&eventType=live&key=k%26y"
        );
    }

    #[test]
    fn test_placeholder_credentials_never_poll() {
        let sink = RecordingSink::new();
        let source = ScriptedLiveSource::new(vec![true]);
        let sender = Arc::new(MessageSender::new(Arc::new(PlainTextRenderer), sink.clone()));
        let poller = LiveStatusPoller::new(
            new_config_handle(ConfigSnapshot::default()),
            source.clone(),
            sender,
        );

        let transition = tokio_test::block_on(poller.tick());
        assert_eq!(transition, LiveTransition::Unchanged);
        assert_eq!(source.calls(), 0);
        assert!(sink.messages().is_empty());
    }
}
