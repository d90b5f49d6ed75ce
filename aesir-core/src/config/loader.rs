// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use serde_yaml::{Mapping, Value};
use tracing::{debug, error, info};

use aesir_common::models::config::{self as defaults, ConfigSnapshot};
use crate::config::ConfigHandle;
use crate::Error;

/// What a reload put into the handle.
#[derive(Debug, Clone)]
pub enum ReloadOutcome {
    Loaded(Arc<ConfigSnapshot>),
    FellBack(Arc<ConfigSnapshot>),
}

impl ReloadOutcome {
    pub fn snapshot(&self) -> &Arc<ConfigSnapshot> {
        match self {
            ReloadOutcome::Loaded(s) | ReloadOutcome::FellBack(s) => s,
        }
    }

    pub fn fell_back(&self) -> bool {
        matches!(self, ReloadOutcome::FellBack(_))
    }
}

/// Reads the plugin's YAML config, substituting a default for every key
/// that is missing or has the wrong type.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails. On any I/O or parse error the failure is logged and
    /// [`ConfigSnapshot::fallback`] is returned instead.
    pub fn load(&self) -> ConfigSnapshot {
        match self.try_load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Error loading configuration file {}: {}", self.path.display(), e);
                ConfigSnapshot::fallback()
            }
        }
    }

    /// Writes the documented defaults if the file does not exist yet, then
    /// parses it.
    pub fn try_load(&self) -> Result<ConfigSnapshot, Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.path.exists() {
            info!("No config at {}, writing defaults", self.path.display());
            self.write_defaults()?;
        }
        let raw = fs::read_to_string(&self.path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn write_defaults(&self) -> Result<(), Error> {
        let doc = serde_yaml::to_string(&ConfigSnapshot::documented_defaults())?;
        fs::write(&self.path, doc)?;
        Ok(())
    }

    /// Loads the file and swaps the result into `handle` in one step. A
    /// file that cannot be read or parsed still replaces the live snapshot,
    /// with [`ConfigSnapshot::fallback`].
    pub fn reload(&self, handle: &ConfigHandle) -> ReloadOutcome {
        match self.try_load() {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                handle.store(snapshot.clone());
                info!("Configuration reloaded successfully.");
                ReloadOutcome::Loaded(snapshot)
            }
            Err(e) => {
                error!("Error reloading configuration file {}: {}", self.path.display(), e);
                let snapshot = Arc::new(ConfigSnapshot::fallback());
                handle.store(snapshot.clone());
                ReloadOutcome::FellBack(snapshot)
            }
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<ConfigSnapshot, Error> {
        let doc: Value = serde_yaml::from_str(raw)?;
        let map = match doc {
            Value::Mapping(map) => map,
            // an empty file parses as null
            Value::Null => Mapping::new(),
            other => {
                return Err(Error::Config(format!(
                    "expected a mapping at the document root, found {}",
                    value_kind(&other)
                )));
            }
        };
        Ok(snapshot_from_mapping(&map))
    }
}

fn snapshot_from_mapping(map: &Mapping) -> ConfigSnapshot {
    ConfigSnapshot {
        broadcast_messages: broadcast_list(map),
        title_main_message: string_or(map, "TitleMainMessage", defaults::DEFAULT_TITLE_MAIN_MESSAGE),
        custom_title_main_message: string_or(
            map,
            "CustomTitleMainMessage",
            defaults::DEFAULT_CUSTOM_TITLE_MAIN_MESSAGE,
        ),
        title_message: string_or(map, "TitleMessage", defaults::DEFAULT_TITLE_MESSAGE),
        title_fade_in_secs: seconds_or(map, "TitleFadeIn", defaults::DEFAULT_TITLE_FADE_IN_SECS),
        title_stay_secs: seconds_or(map, "TitleStay", defaults::DEFAULT_TITLE_STAY_SECS),
        title_fade_out_secs: seconds_or(map, "TitleFadeOut", defaults::DEFAULT_TITLE_FADE_OUT_SECS),
        broadcast_interval_secs: interval_or(
            map,
            "BroadcastInterval",
            defaults::DEFAULT_BROADCAST_INTERVAL_SECS,
        ),
        youtube_api_key: string_or(map, "YouTubeAPIKey", defaults::DEFAULT_YOUTUBE_API_KEY),
        youtube_channel_id: string_or(map, "YouTubeChannelID", defaults::DEFAULT_YOUTUBE_CHANNEL_ID),
        youtube_check_interval_secs: interval_or(
            map,
            "YouTubeCheckInterval",
            defaults::DEFAULT_YOUTUBE_CHECK_INTERVAL_SECS,
        ),
        hover_message: string_or(map, "HoverMessage", defaults::DEFAULT_HOVER_MESSAGE),
        broadcast_url: string_or(map, "BroadcastURL", defaults::DEFAULT_BROADCAST_URL),
    }
}

/// Keeps only the string entries of the `Broadcast` sequence. Anything
/// that would leave the list empty yields the single default message.
fn broadcast_list(map: &Mapping) -> Vec<String> {
    let messages: Vec<String> = match map.get("Broadcast") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    if messages.is_empty() {
        debug!("Broadcast list missing or empty, using default message");
        vec![defaults::DEFAULT_BROADCAST_MESSAGE.to_string()]
    } else {
        messages
    }
}

fn string_or(map: &Mapping, key: &str, default: &str) -> String {
    match map.get(key).and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => {
            if map.contains_key(key) {
                debug!("Config key '{}' is not a string, using default", key);
            }
            default.to_string()
        }
    }
}

/// Non-negative whole seconds.
fn seconds_or(map: &Mapping, key: &str, default: u64) -> u64 {
    match map.get(key).and_then(Value::as_u64) {
        Some(v) => v,
        None => {
            if map.contains_key(key) {
                debug!("Config key '{}' is not a non-negative integer, using default", key);
            }
            default
        }
    }
}

/// Strictly positive whole seconds. Zero would make a timer spin.
fn interval_or(map: &Mapping, key: &str, default: u64) -> u64 {
    match seconds_or(map, key, default) {
        0 => {
            debug!("Config key '{}' must be positive, using default", key);
            default
        }
        v => v,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
