//! src/plugin.rs
//!
//! Entry point a proxy host drives: build with the host's capabilities,
//! call `initialize` once the proxy is up, route `/ab` invocations through
//! `commands()`, and call `shutdown` when the proxy stops.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use aesir_common::models::ConfigSnapshot;
use aesir_common::traits::{LiveStatusSource, PermissionCheck, PlayerSink, Scheduler, TextRenderer};
use crate::config::{new_config_handle, ConfigHandle, ConfigLoader, ReloadOutcome};
use crate::services::{BroadcastService, CommandService, MessageSender, TitleService};
use crate::tasks::LiveStatusPoller;
use crate::Error;

pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Capabilities supplied by the proxy runtime.
#[derive(Clone)]
pub struct HostServices {
    pub scheduler: Arc<dyn Scheduler>,
    pub sink: Arc<dyn PlayerSink>,
    pub permissions: Arc<dyn PermissionCheck>,
    pub renderer: Arc<dyn TextRenderer>,
    pub live_source: Arc<dyn LiveStatusSource>,
}

pub struct AesirBroadcast {
    config: ConfigHandle,
    loader: ConfigLoader,
    poller: Arc<LiveStatusPoller>,
    broadcast: Arc<BroadcastService>,
    commands: CommandService,
    scheduler: Arc<dyn Scheduler>,
}

impl AesirBroadcast {
    /// Loads `<data_dir>/config.yml` (writing defaults if it is missing)
    /// and wires every service to the resulting snapshot.
    pub fn new(data_dir: impl AsRef<Path>, host: HostServices) -> Self {
        let loader = ConfigLoader::new(config_path(data_dir.as_ref()));
        let config = new_config_handle(loader.load());
        info!("Loaded configuration from {}", loader.path().display());
        Self::with_config(config, loader, host)
    }

    pub fn with_config(config: ConfigHandle, loader: ConfigLoader, host: HostServices) -> Self {
        let sender = Arc::new(MessageSender::new(host.renderer.clone(), host.sink.clone()));
        let poller = LiveStatusPoller::new(config.clone(), host.live_source.clone(), sender.clone());
        let broadcast = BroadcastService::new(config.clone(), sender.clone());
        let titles = Arc::new(TitleService::new(config.clone(), sender));
        let commands = CommandService::new(
            broadcast.clone(),
            titles,
            host.permissions.clone(),
            host.scheduler.clone(),
            loader.clone(),
            config.clone(),
        );
        Self {
            config,
            loader,
            poller,
            broadcast,
            commands,
            scheduler: host.scheduler,
        }
    }

    /// Starts the live-status poller. The periodic broadcast waits for
    /// `/ab broadcaststart`.
    pub fn initialize(&self) -> Result<(), Error> {
        self.poller.start(self.scheduler.as_ref()).map_err(|e| {
            error!("Could not start YouTube live checker: {}", e);
            e
        })
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    pub fn poller(&self) -> &Arc<LiveStatusPoller> {
        &self.poller
    }

    pub fn broadcast(&self) -> &Arc<BroadcastService> {
        &self.broadcast
    }

    pub fn config(&self) -> Arc<ConfigSnapshot> {
        self.config.load_full()
    }

    /// Re-reads `config.yml` into the shared handle. Running timers keep
    /// their period.
    pub fn reload(&self) -> ReloadOutcome {
        self.loader.reload(&self.config)
    }

    pub fn shutdown(&self) {
        self.poller.stop();
        self.broadcast.shutdown();
        info!("AesirBroadcast shut down");
    }
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}
