// src/scheduler.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use aesir_common::traits::{ScheduledTask, Scheduler, TaskHandle};
use crate::Error;

/// Runs repeating tasks on a tokio runtime.
///
/// Each task gets its own spawned loop driven by `tokio::time::interval`,
/// so the first run is immediate and later runs keep a fixed rate. The loop
/// awaits each run before waiting for the next tick, so a slow run delays
/// only its own task.
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Uses the runtime the caller is running on.
    pub fn current() -> Result<Self, Error> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Scheduler(format!("no tokio runtime available: {}", e)))?;
        Ok(Self { runtime })
    }
}

impl Scheduler for TokioScheduler {
    fn repeat(&self, period: Duration, task: ScheduledTask) -> Result<Box<dyn TaskHandle>, Error> {
        if period.is_zero() {
            return Err(Error::Scheduler("repeat period must be greater than zero".into()));
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        let join = self.runtime.spawn(async move {
            let mut ticker = interval(period);
            // a run that overshoots its period must not be followed by a burst
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                (task)().await;
            }
        });
        debug!("Scheduled repeating task every {:?}", period);
        Ok(Box::new(TokioTaskHandle { join, cancelled }))
    }
}

pub struct TokioTaskHandle {
    join: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle for TokioTaskHandle {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.join.abort();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use futures_util::FutureExt;
    use tokio::time::sleep;

    fn counting_task(counter: Arc<AtomicUsize>) -> ScheduledTask {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_run_is_immediate_then_fixed_rate() {
        let scheduler = TokioScheduler::current().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let handle = scheduler
            .repeat(Duration::from_secs(5), counting_task(runs.clone()))
            .unwrap();

        sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        handle.cancel();
        assert!(handle.is_cancelled());
        sleep(Duration::from_secs(20)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2, "no runs after cancel");
    }

    #[tokio::test]
    async fn test_zero_period_is_rejected() {
        let scheduler = TokioScheduler::current().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let res = scheduler.repeat(Duration::ZERO, counting_task(runs));
        assert!(matches!(res, Err(Error::Scheduler(_))));
    }
}
