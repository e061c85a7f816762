//! Monitor behaviour against a real store on disk.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tock_core::entities::{Task, Timesheet};
use tock_core::enums::RunStatus;
use tock_db::DEFAULT_BUSY_TIMEOUT;
use tock_db::service::TockService;
use tock_monitor::{BusMessage, StatusEvent, StatusMonitor, Subscription};

const POLL: Duration = Duration::from_millis(50);

async fn setup() -> (TempDir, Arc<TockService>, StatusMonitor) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tock.db");
    let svc = Arc::new(
        TockService::new_local(path.to_str().unwrap(), DEFAULT_BUSY_TIMEOUT)
            .await
            .unwrap(),
    );
    let monitor = StatusMonitor::new(svc.clone(), POLL, 16);
    (dir, svc, monitor)
}

async fn next_event(sub: &mut Subscription) -> StatusEvent {
    let message = tokio::time::timeout(Duration::from_secs(2), sub.recv())
        .await
        .expect("no status event within two seconds");
    match message {
        Some(BusMessage::Next(event)) => event,
        Some(BusMessage::Error(message)) => panic!("unexpected error signal: {message}"),
        None => panic!("bus closed"),
    }
}

#[tokio::test]
async fn open_timesheet_is_seen_within_one_interval() {
    let (_dir, svc, monitor) = setup().await;
    let task = svc.create_task(&Task::new("Write report", "")).await.unwrap();
    monitor.start(None).unwrap();
    assert_eq!(monitor.timesheet_status(), RunStatus::Idle);

    let mut sub = monitor.subscribe();
    svc.create_timesheet(&Timesheet::open(task.id, chrono::Utc::now()))
        .await
        .unwrap();

    let event = next_event(&mut sub).await;
    assert_eq!(event.status, RunStatus::Running);
    assert_eq!(monitor.timesheet_status(), RunStatus::Running);
    assert_eq!(
        monitor.running_timesheet().unwrap().task.synopsis,
        "Write report"
    );
    monitor.close().await.unwrap();
}

#[tokio::test]
async fn stopping_with_nothing_running_changes_nothing() {
    let (_dir, svc, monitor) = setup().await;
    monitor.reconcile().await;
    let mut sub = monitor.subscribe();

    let err = svc.stop_running().await.unwrap_err();
    assert!(err.is_no_running_task());

    assert_eq!(monitor.reconcile().await, RunStatus::Idle);
    monitor.close().await.unwrap();
    assert_eq!(sub.recv().await, None, "no event may be published");
}

#[tokio::test]
async fn switch_is_eventually_observed() {
    let (_dir, svc, monitor) = setup().await;
    let a = svc.create_task(&Task::new("A", "")).await.unwrap();
    let b = svc.create_task(&Task::new("B", "")).await.unwrap();
    svc.switch_task(a.id).await.unwrap();

    let mut sub = monitor.subscribe();
    monitor.start(None).unwrap();
    let first = next_event(&mut sub).await;
    assert_eq!(first.running_timesheet.unwrap().task.synopsis, "A");

    svc.stop_running().await.unwrap();
    svc.switch_task(b.id).await.unwrap();

    // An idle transition in between may or may not be observed.
    let mut last = next_event(&mut sub).await;
    while last.status != RunStatus::Running {
        last = next_event(&mut sub).await;
    }
    assert_eq!(last.running_timesheet.unwrap().task.synopsis, "B");
    assert_eq!(svc.search_open().await.unwrap().len(), 1);
    monitor.close().await.unwrap();
}

#[tokio::test]
async fn stopped_monitor_stops_polling() {
    let (_dir, svc, monitor) = setup().await;
    let task = svc.create_task(&Task::new("A", "")).await.unwrap();
    monitor.start(None).unwrap();
    tokio::time::sleep(POLL * 2).await;
    monitor.stop().await.unwrap();

    svc.switch_task(task.id).await.unwrap();
    tokio::time::sleep(POLL * 3).await;
    assert_eq!(monitor.timesheet_status(), RunStatus::Idle);

    monitor.start(None).unwrap();
    tokio::time::sleep(POLL * 3).await;
    assert_eq!(monitor.timesheet_status(), RunStatus::Running);
    monitor.close().await.unwrap();
}
