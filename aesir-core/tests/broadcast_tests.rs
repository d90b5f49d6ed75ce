// tests/broadcast_tests.rs

use std::sync::Arc;
use std::time::Duration;

use aesir_core::config::ConfigHandle;
use aesir_core::models::{ClickAction, ConfigSnapshot};
use aesir_core::render::PlainTextRenderer;
use aesir_core::services::{BroadcastService, BroadcastState, MessageSender, StartOutcome, StopOutcome};
use aesir_core::test_utils::helpers::{
    test_config_handle, FailingScheduler, ManualScheduler, RecordingSink,
};
use aesir_core::Error;

fn build_service(config: ConfigHandle) -> (Arc<BroadcastService>, Arc<RecordingSink>) {
    let sink = RecordingSink::new();
    let sender = Arc::new(MessageSender::new(Arc::new(PlainTextRenderer), sink.clone()));
    (BroadcastService::new(config, sender), sink)
}

#[tokio::test]
async fn test_start_twice_schedules_one_timer() -> Result<(), Error> {
    let (service, _sink) = build_service(test_config_handle());
    let scheduler = ManualScheduler::new();

    assert_eq!(service.start(scheduler.as_ref())?, StartOutcome::Started { interval_secs: 5 });
    assert_eq!(service.start(scheduler.as_ref())?, StartOutcome::AlreadyRunning);

    assert_eq!(scheduler.scheduled_count(), 1);
    assert_eq!(scheduler.periods(), vec![Duration::from_secs(5)]);
    assert_eq!(service.state(), BroadcastState::Running);
    Ok(())
}

#[tokio::test]
async fn test_stop_when_stopped_is_a_no_op() {
    let (service, _sink) = build_service(test_config_handle());
    assert_eq!(service.stop(), StopOutcome::NotRunning);
    assert_eq!(service.state(), BroadcastState::Stopped);
}

#[tokio::test]
async fn test_stop_gates_the_timer_without_cancelling_it() -> Result<(), Error> {
    let (service, sink) = build_service(test_config_handle());
    let scheduler = ManualScheduler::new();
    service.start(scheduler.as_ref())?;

    // tick 1 while running
    scheduler.run_all().await;
    assert_eq!(sink.messages().len(), 2);

    assert_eq!(service.stop(), StopOutcome::Stopped);

    // tick 2 after stop: timer still alive, nothing sent
    scheduler.run_all().await;
    assert_eq!(sink.messages().len(), 2);
    assert_eq!(scheduler.active_count(), 1);
    assert!(service.has_timer());
    Ok(())
}

#[tokio::test]
async fn test_restart_replaces_lingering_timer() -> Result<(), Error> {
    let (service, sink) = build_service(test_config_handle());
    let scheduler = ManualScheduler::new();

    service.start(scheduler.as_ref())?;
    service.stop();
    service.start(scheduler.as_ref())?;

    assert_eq!(scheduler.scheduled_count(), 2);
    assert_eq!(scheduler.active_count(), 1, "old timer was cancelled");

    scheduler.run_all().await;
    assert_eq!(sink.messages().len(), 2, "only one timer emits");
    Ok(())
}

#[tokio::test]
async fn test_broadcast_now_ignores_state_and_uses_store_url() {
    let (service, sink) = build_service(test_config_handle());
    assert_eq!(service.broadcast_now(), 2);
    assert!(!service.is_running());

    for msg in sink.messages() {
        assert_eq!(msg.click, Some(ClickAction::OpenUrl("https://store.aesirmc.com".into())));
        assert!(msg.hover.is_some());
    }
}

#[tokio::test]
async fn test_interval_is_captured_at_start() -> Result<(), Error> {
    let config = test_config_handle();
    let (service, _sink) = build_service(config.clone());
    let scheduler = ManualScheduler::new();

    service.start(scheduler.as_ref())?;
    config.store(Arc::new(ConfigSnapshot {
        broadcast_interval_secs: 120,
        ..(*config.load_full()).clone()
    }));
    service.stop();
    service.start(scheduler.as_ref())?;

    assert_eq!(
        scheduler.periods(),
        vec![Duration::from_secs(5), Duration::from_secs(120)]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_scheduling_leaves_service_stopped() {
    let (service, _sink) = build_service(test_config_handle());
    let res = service.start(&FailingScheduler);
    assert!(matches!(res, Err(Error::Scheduler(_))));
    assert_eq!(service.state(), BroadcastState::Stopped);
}

#[tokio::test]
async fn test_concurrent_starts_schedule_one_timer() {
    let (service, _sink) = build_service(test_config_handle());
    let scheduler = ManualScheduler::new();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let scheduler = scheduler.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            service.start(scheduler.as_ref()).unwrap()
        }));
    }
    let mut started = 0;
    for h in handles {
        if matches!(h.await.unwrap(), StartOutcome::Started { .. }) {
            started += 1;
        }
    }
    assert_eq!(started, 1);
    assert_eq!(scheduler.scheduled_count(), 1);
}

#[tokio::test]
async fn test_shutdown_cancels_timer() -> Result<(), Error> {
    let (service, _sink) = build_service(test_config_handle());
    let scheduler = ManualScheduler::new();
    service.start(scheduler.as_ref())?;
    service.shutdown();
    assert_eq!(scheduler.active_count(), 0);
    assert_eq!(service.state(), BroadcastState::Stopped);
    assert!(!service.has_timer());
    Ok(())
}
