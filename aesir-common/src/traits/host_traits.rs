//! Narrow views of the proxy runtime.
//!
//! The broadcast and live-status logic never talks to a concrete proxy.
//! Everything it needs from the host (timers, players, permissions and
//! text formatting) comes in through one of these traits, so tests can
//! swap in fakes and a different host only has to implement them.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::Error;
use crate::models::{CommandSource, Component, Title};

/// Body of a repeating task. Called once per period; each call yields the
/// future for that run.
pub type ScheduledTask = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Handle to a repeating task.
pub trait TaskHandle: Send + Sync {
    fn cancel(&self);
    fn is_cancelled(&self) -> bool;
}

/// Host-provided timer service.
pub trait Scheduler: Send + Sync {
    /// Runs `task` now and then again every `period`, until the returned
    /// handle is cancelled. A run never starts while the previous run of
    /// the same task is still in progress.
    fn repeat(&self, period: Duration, task: ScheduledTask) -> Result<Box<dyn TaskHandle>, Error>;
}

/// Delivery to every player currently connected to the proxy.
/// Fire-and-forget: there is no acknowledgement and no retry.
pub trait PlayerSink: Send + Sync {
    fn send_to_all(&self, component: &Component);
    fn show_title_to_all(&self, title: &Title);
}

pub trait PermissionCheck: Send + Sync {
    fn has_permission(&self, source: &CommandSource, permission: &str) -> bool;
}

/// Turns a template string into a display component.
pub trait TextRenderer: Send + Sync {
    fn render(&self, template: &str) -> Component;
}

/// Answers "is this channel live right now?".
///
/// Implementations fail closed: any error means `false`.
#[async_trait]
pub trait LiveStatusSource: Send + Sync {
    async fn is_live(&self, api_key: &str, channel_id: &str) -> bool;
}
