// File: aesir-core/src/test_utils/helpers.rs
//
// In-memory stand-ins for the proxy host, shared by unit and integration tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use parking_lot::Mutex;

use aesir_common::models::{CommandSource, Component, ConfigSnapshot, Title};
use aesir_common::traits::{
    LiveStatusSource, PermissionCheck, PlayerSink, ScheduledTask, Scheduler, TaskHandle,
};
use crate::config::{new_config_handle, ConfigHandle};
use crate::plugin::HostServices;
use crate::render::PlainTextRenderer;
use crate::Error;

struct ManualEntry {
    period: Duration,
    task: ScheduledTask,
    cancelled: Arc<AtomicBool>,
}

/// Scheduler that never fires on its own. Tests drive it with `run_all`.
#[derive(Default)]
pub struct ManualScheduler {
    entries: Mutex<Vec<ManualEntry>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every task ever scheduled, cancelled or not.
    pub fn scheduled_count(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn active_count(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|e| !e.cancelled.load(Ordering::SeqCst))
            .count()
    }

    pub fn periods(&self) -> Vec<Duration> {
        self.entries.lock().iter().map(|e| e.period).collect()
    }

    /// Runs every task that has not been cancelled, once, in scheduling order.
    pub async fn run_all(&self) {
        let tasks: Vec<ScheduledTask> = self
            .entries
            .lock()
            .iter()
            .filter(|e| !e.cancelled.load(Ordering::SeqCst))
            .map(|e| e.task.clone())
            .collect();
        for task in tasks {
            (task)().await;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn repeat(&self, period: Duration, task: ScheduledTask) -> Result<Box<dyn TaskHandle>, Error> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.entries.lock().push(ManualEntry {
            period,
            task,
            cancelled: cancelled.clone(),
        });
        Ok(Box::new(ManualTaskHandle { cancelled }))
    }
}

pub struct ManualTaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle for ManualTaskHandle {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Scheduler whose every `repeat` call fails.
pub struct FailingScheduler;

impl Scheduler for FailingScheduler {
    fn repeat(&self, _period: Duration, _task: ScheduledTask) -> Result<Box<dyn TaskHandle>, Error> {
        Err(Error::Scheduler("scheduler is shut down".into()))
    }
}

/// Remembers everything delivered to "all players".
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<Component>>,
    titles: Mutex<Vec<Title>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<Component> {
        self.messages.lock().clone()
    }

    pub fn titles(&self) -> Vec<Title> {
        self.titles.lock().clone()
    }
}

impl PlayerSink for RecordingSink {
    fn send_to_all(&self, component: &Component) {
        self.messages.lock().push(component.clone());
    }

    fn show_title_to_all(&self, title: &Title) {
        self.titles.lock().push(title.clone());
    }
}

/// Per-player permission grants.
#[derive(Default)]
pub struct StaticPermissions {
    grants: Mutex<HashMap<String, HashSet<String>>>,
}

impl StaticPermissions {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn grant(&self, player: &str, permission: &str) {
        self.grants
            .lock()
            .entry(player.to_string())
            .or_default()
            .insert(permission.to_string());
    }
}

impl PermissionCheck for StaticPermissions {
    fn has_permission(&self, source: &CommandSource, permission: &str) -> bool {
        self.grants
            .lock()
            .get(source.name())
            .is_some_and(|perms| perms.contains(permission))
    }
}

/// Answers from a fixed script, then `false` once the script runs out.
#[derive(Default)]
pub struct ScriptedLiveSource {
    script: Mutex<VecDeque<bool>>,
    calls: AtomicUsize,
}

impl ScriptedLiveSource {
    pub fn new(script: impl IntoIterator<Item = bool>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn push(&self, live: bool) {
        self.script.lock().push_back(live);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveStatusSource for ScriptedLiveSource {
    async fn is_live(&self, _api_key: &str, _channel_id: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().pop_front().unwrap_or(false)
    }
}

/// A snapshot with real-looking YouTube credentials so the poller queries
/// its source.
pub fn test_config() -> ConfigSnapshot {
    ConfigSnapshot {
        broadcast_messages: vec!["&aFirst line".to_string(), "<b>Second line</b>".to_string()],
        youtube_api_key: "test-key".to_string(),
        youtube_channel_id: "UCtest".to_string(),
        broadcast_interval_secs: 5,
        ..ConfigSnapshot::default()
    }
}

pub fn test_config_handle() -> ConfigHandle {
    new_config_handle(test_config())
}

/// Bundle of fakes plus the `HostServices` built from them.
pub struct TestHost {
    pub scheduler: Arc<ManualScheduler>,
    pub sink: Arc<RecordingSink>,
    pub permissions: Arc<StaticPermissions>,
    pub live_source: Arc<ScriptedLiveSource>,
    pub services: HostServices,
}

impl TestHost {
    pub fn new() -> Self {
        let scheduler = ManualScheduler::new();
        let sink = RecordingSink::new();
        let permissions = StaticPermissions::new();
        let live_source = ScriptedLiveSource::new(Vec::<bool>::new());
        let services = HostServices {
            scheduler: scheduler.clone(),
            sink: sink.clone(),
            permissions: permissions.clone(),
            renderer: Arc::new(PlainTextRenderer),
            live_source: live_source.clone(),
        };
        Self {
            scheduler,
            sink,
            permissions,
            live_source,
            services,
        }
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}
