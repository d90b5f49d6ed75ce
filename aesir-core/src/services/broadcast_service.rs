// File: aesir-core/src/services/broadcast_service.rs

use std::sync::{Arc, Weak};
use futures_util::FutureExt;
use parking_lot::Mutex;
use tracing::{debug, info};

use aesir_common::traits::{ScheduledTask, Scheduler, TaskHandle};
use crate::config::ConfigHandle;
use crate::services::message_sender::MessageSender;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { interval_secs: u64 },
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

struct BroadcastInner {
    state: BroadcastState,
    timer: Option<Box<dyn TaskHandle>>,
}

/// Periodic broadcast of the configured messages, toggled by command.
///
/// `stop()` only flips the state back to `Stopped`. The timer keeps firing
/// and each run checks the state before sending anything. A later `start()`
/// cancels that lingering timer before scheduling a fresh one, so at most
/// one timer can ever emit.
pub struct BroadcastService {
    config: ConfigHandle,
    sender: Arc<MessageSender>,
    inner: Mutex<BroadcastInner>,
}

impl BroadcastService {
    pub fn new(config: ConfigHandle, sender: Arc<MessageSender>) -> Arc<Self> {
        Arc::new(Self {
            config,
            sender,
            inner: Mutex::new(BroadcastInner {
                state: BroadcastState::Stopped,
                timer: None,
            }),
        })
    }

    pub fn state(&self) -> BroadcastState {
        self.inner.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == BroadcastState::Running
    }

    /// The interval is read from the snapshot current at this call and
    /// stays fixed for the lifetime of the timer.
    pub fn start(self: &Arc<Self>, scheduler: &dyn Scheduler) -> Result<StartOutcome, Error> {
        // Held across scheduling so two concurrent starts cannot both see Stopped.
        // The immediate first tick waits on this lock in emit_if_running and
        // then sees Running; it never takes the lock while repeat() runs.
        let mut inner = self.inner.lock();
        if inner.state == BroadcastState::Running {
            debug!("Broadcast start requested while already running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        if let Some(old) = inner.timer.take() {
            debug!("Cancelling idle broadcast timer before rescheduling");
            old.cancel();
        }

        let snapshot = self.config.load_full();
        let interval_secs = snapshot.broadcast_interval_secs;
        let timer = scheduler.repeat(snapshot.broadcast_interval(), self.timer_task())?;

        inner.timer = Some(timer);
        inner.state = BroadcastState::Running;
        info!("Broadcast started every {} seconds.", interval_secs);
        Ok(StartOutcome::Started { interval_secs })
    }

    pub fn stop(&self) -> StopOutcome {
        let mut inner = self.inner.lock();
        match inner.state {
            BroadcastState::Stopped => StopOutcome::NotRunning,
            BroadcastState::Running => {
                inner.state = BroadcastState::Stopped;
                info!("Broadcast stopped.");
                StopOutcome::Stopped
            }
        }
    }

    /// One-off broadcast, independent of the periodic loop and its state.
    pub fn broadcast_now(&self) -> usize {
        let snapshot = self.config.load_full();
        let sent = self.sender.broadcast_messages(&snapshot, &snapshot.broadcast_url);
        info!("Broadcast messages sent: {:?}", snapshot.broadcast_messages);
        sent
    }

    /// Timer body. Returns whether anything was sent.
    pub fn emit_if_running(&self) -> bool {
        if !self.is_running() {
            debug!("Broadcast timer fired while stopped, skipping");
            return false;
        }
        let snapshot = self.config.load_full();
        self.sender.broadcast_messages(&snapshot, &snapshot.broadcast_url);
        info!("Broadcast sent automatically.");
        true
    }

    /// Cancels the timer, running or lingering, and returns to `Stopped`.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        if let Some(timer) = inner.timer.take() {
            timer.cancel();
        }
        inner.state = BroadcastState::Stopped;
    }

    pub fn has_timer(&self) -> bool {
        self.inner
            .lock()
            .timer
            .as_ref()
            .is_some_and(|t| !t.is_cancelled())
    }

    fn timer_task(self: &Arc<Self>) -> ScheduledTask {
        let weak: Weak<Self> = Arc::downgrade(self);
        Arc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(service) = weak.upgrade() {
                    service.emit_if_running();
                }
            }
            .boxed()
        })
    }
}
