use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::models::message::TitleTimes;

pub const DEFAULT_BROADCAST_MESSAGE: &str = "&aAesirMC is now live!";
pub const DEFAULT_TITLE_MAIN_MESSAGE: &str = "<red>Announcement!</red>";
pub const DEFAULT_CUSTOM_TITLE_MAIN_MESSAGE: &str = "<blue>Custom Announcement!</blue>";
pub const DEFAULT_TITLE_MESSAGE: &str = "<green>AesirMC is now live!</green>";
pub const DEFAULT_TITLE_FADE_IN_SECS: u64 = 1;
pub const DEFAULT_TITLE_STAY_SECS: u64 = 3;
pub const DEFAULT_TITLE_FADE_OUT_SECS: u64 = 1;
pub const DEFAULT_BROADCAST_INTERVAL_SECS: u64 = 900;
pub const DEFAULT_YOUTUBE_API_KEY: &str = "YOUR_YOUTUBE_API_KEY";
pub const DEFAULT_YOUTUBE_CHANNEL_ID: &str = "YOUR_CHANNEL_ID";
pub const DEFAULT_YOUTUBE_CHECK_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_HOVER_MESSAGE: &str = "<yellow>Click to visit!</yellow>";
pub const DEFAULT_BROADCAST_URL: &str = "https://store.aesirmc.com";

/// Everything the plugin can be tuned with, as read from `config.yml`.
///
/// A snapshot is never mutated after construction. Reloading builds a new
/// snapshot and swaps it in whole, so a running timer sees either the old
/// values or the new ones and never a mix of both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(rename = "Broadcast")]
    pub broadcast_messages: Vec<String>,
    #[serde(rename = "TitleMainMessage")]
    pub title_main_message: String,
    #[serde(rename = "CustomTitleMainMessage")]
    pub custom_title_main_message: String,
    #[serde(rename = "TitleMessage")]
    pub title_message: String,
    #[serde(rename = "TitleFadeIn")]
    pub title_fade_in_secs: u64,
    #[serde(rename = "TitleStay")]
    pub title_stay_secs: u64,
    #[serde(rename = "TitleFadeOut")]
    pub title_fade_out_secs: u64,
    #[serde(rename = "BroadcastInterval")]
    pub broadcast_interval_secs: u64,
    #[serde(rename = "YouTubeAPIKey")]
    pub youtube_api_key: String,
    #[serde(rename = "YouTubeChannelID")]
    pub youtube_channel_id: String,
    #[serde(rename = "YouTubeCheckInterval")]
    pub youtube_check_interval_secs: u64,
    #[serde(rename = "HoverMessage")]
    pub hover_message: String,
    #[serde(rename = "BroadcastURL")]
    pub broadcast_url: String,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            broadcast_messages: vec![DEFAULT_BROADCAST_MESSAGE.to_string()],
            title_main_message: DEFAULT_TITLE_MAIN_MESSAGE.to_string(),
            custom_title_main_message: DEFAULT_CUSTOM_TITLE_MAIN_MESSAGE.to_string(),
            title_message: DEFAULT_TITLE_MESSAGE.to_string(),
            title_fade_in_secs: DEFAULT_TITLE_FADE_IN_SECS,
            title_stay_secs: DEFAULT_TITLE_STAY_SECS,
            title_fade_out_secs: DEFAULT_TITLE_FADE_OUT_SECS,
            broadcast_interval_secs: DEFAULT_BROADCAST_INTERVAL_SECS,
            youtube_api_key: DEFAULT_YOUTUBE_API_KEY.to_string(),
            youtube_channel_id: DEFAULT_YOUTUBE_CHANNEL_ID.to_string(),
            youtube_check_interval_secs: DEFAULT_YOUTUBE_CHECK_INTERVAL_SECS,
            hover_message: DEFAULT_HOVER_MESSAGE.to_string(),
            broadcast_url: DEFAULT_BROADCAST_URL.to_string(),
        }
    }
}

impl ConfigSnapshot {
    /// The document written to disk when no config file exists yet.
    pub fn documented_defaults() -> Self {
        Self {
            broadcast_messages: vec![
                DEFAULT_BROADCAST_MESSAGE.to_string(),
                "&bJoin the adventure now!".to_string(),
            ],
            ..Self::default()
        }
    }

    /// Minimal set used when the config file cannot be read or parsed.
    /// YouTube credentials are left empty, which disables live polling.
    pub fn fallback() -> Self {
        Self {
            broadcast_messages: vec!["AesirMC is now live!".to_string()],
            title_message: "Announcement! AesirMC is now live!".to_string(),
            youtube_api_key: String::new(),
            youtube_channel_id: String::new(),
            ..Self::default()
        }
    }

    pub fn title_times(&self) -> TitleTimes {
        TitleTimes {
            fade_in: Duration::from_secs(self.title_fade_in_secs),
            stay: Duration::from_secs(self.title_stay_secs),
            fade_out: Duration::from_secs(self.title_fade_out_secs),
        }
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_secs(self.broadcast_interval_secs)
    }

    pub fn youtube_check_interval(&self) -> Duration {
        Duration::from_secs(self.youtube_check_interval_secs)
    }

    /// Where players land when they click a "we're live" announcement.
    pub fn live_stream_url(&self) -> String {
        format!("https://www.youtube.com/channel/{}", self.youtube_channel_id)
    }

    /// False when either credential is blank or still the shipped placeholder.
    pub fn has_youtube_credentials(&self) -> bool {
        let key = self.youtube_api_key.trim();
        let channel = self.youtube_channel_id.trim();
        !key.is_empty()
            && !channel.is_empty()
            && key != DEFAULT_YOUTUBE_API_KEY
            && channel != DEFAULT_YOUTUBE_CHANNEL_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_never_empty() {
        let cfg = ConfigSnapshot::default();
        assert_eq!(cfg.broadcast_messages.len(), 1);
        assert_eq!(cfg.broadcast_interval_secs, 900);
        assert_eq!(cfg.youtube_check_interval_secs, 60);
        assert_eq!(cfg.title_times().stay, Duration::from_secs(3));
    }

    #[test]
    fn test_fallback_disables_youtube() {
        let cfg = ConfigSnapshot::fallback();
        assert!(!cfg.has_youtube_credentials());
        assert_eq!(cfg.broadcast_messages, vec!["AesirMC is now live!".to_string()]);
        assert_eq!(cfg.title_message, "Announcement! AesirMC is now live!");
    }

    #[test]
    fn test_placeholder_credentials_are_not_credentials() {
        let mut cfg = ConfigSnapshot::default();
        assert!(!cfg.has_youtube_credentials());

        cfg.youtube_api_key = "abc".into();
        assert!(!cfg.has_youtube_credentials(), "channel id is still the placeholder");

        cfg.youtube_channel_id = "UC123".into();
        assert!(cfg.has_youtube_credentials());
        assert_eq!(cfg.live_stream_url(), "https://www.youtube.com/channel/UC123");
    }
}
