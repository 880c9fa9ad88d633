use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use minaret::bridge::local::{LocalBridge, LocalNotifier};
use minaret::bridge::AlarmBridge;
use minaret::command_handlers::CommandHandlers;
use minaret::models::{
    ActiveAlarmSource, AlarmType, DayTimings, PermissionStatus, Prayer, ScheduledAlarm,
};
use minaret::provider::PrayerTimeProvider;
use minaret::{run_monitor, ActiveAlarmDetector, AppState, Database, MonitorEvent};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Canned provider: every requested day has fajr six hours from now and
/// dhuhr nine hours from now.
struct StaticProvider;

#[async_trait]
impl PrayerTimeProvider for StaticProvider {
    async fn timings_for(&self, date: NaiveDate) -> Result<DayTimings> {
        let mut timings = DayTimings::new(date);
        timings.insert(Prayer::Fajr, Utc::now() + Duration::hours(6));
        timings.insert(Prayer::Dhuhr, Utc::now() + Duration::hours(9));
        Ok(timings)
    }
}

async fn create_test_state() -> Arc<AppState> {
    let temp_file = NamedTempFile::new().unwrap();
    let (_, path) = temp_file.keep().unwrap();
    let db_path = format!("sqlite:{}", path.to_str().unwrap());

    let pool = SqlitePool::connect(&db_path).await.unwrap();
    minaret::database::run_schema(&pool).await.unwrap();

    Arc::new(AppState {
        db: Arc::new(Database { pool }),
        alarms: Arc::new(LocalBridge::new()),
        notifier: Arc::new(LocalNotifier::with_permission(PermissionStatus::Granted)),
        shutdown: tokio_util::sync::CancellationToken::new(),
    })
}

#[tokio::test]
async fn test_snooze_then_dismiss_workflow() {
    let state = create_test_state().await;
    let handlers = CommandHandlers::new(&state.db, &state.alarms);
    let detector = ActiveAlarmDetector::new(state.db.clone(), state.alarms.clone());

    // An alarm that fired fifteen minutes ago
    let alarm = ScheduledAlarm::new(
        "ritual-1".to_string(),
        AlarmType::Fajr,
        "Fajr prayer".to_string(),
        Utc::now() - Duration::minutes(15),
    );
    state.db.schedule_alarm(&alarm).await.unwrap();
    state.alarms.register_alarm(&alarm).await.unwrap();

    let scheduled = state.db.get_scheduled_alarms().await.unwrap();
    let active = detector
        .detect_active_alarm(&scheduled, &HashSet::new())
        .await
        .unwrap();
    assert_eq!(active.source, ActiveAlarmSource::PendingChallenge);

    // Snooze pushes the trigger into the future; detection goes quiet
    handlers.alarms.snooze_alarm("ritual-1").await.unwrap();
    let scheduled = state.db.get_scheduled_alarms().await.unwrap();
    assert!(scheduled[0].trigger_time > Utc::now());

    let active = detector
        .detect_active_alarm(&scheduled, &HashSet::new())
        .await;
    assert!(active.is_none());

    // Dismissal completes the alarm for good
    handlers.alarms.dismiss_alarm("ritual-1").await.unwrap();
    assert!(state.db.get_scheduled_alarms().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_monitor_schedules_on_startup_and_stops_gracefully() {
    let state = create_test_state().await;
    let (tx, mut rx) = mpsc::channel::<MonitorEvent>(32);

    let handle = tokio::spawn(run_monitor(
        state.clone(),
        StaticProvider,
        chrono_tz::UTC,
        Some(tx),
    ));

    let mut saw_refresh = false;
    let mut saw_fajr_alarm = false;
    let mut saw_notifications = false;
    while !(saw_refresh && saw_fajr_alarm && saw_notifications) {
        let event = timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("monitor event timed out")
            .expect("monitor channel closed");
        match event {
            MonitorEvent::TimingsRefreshed { .. } => saw_refresh = true,
            MonitorEvent::AlarmScheduled { alarm_type, .. } => {
                if alarm_type == AlarmType::Fajr {
                    saw_fajr_alarm = true;
                }
            }
            MonitorEvent::NotificationsScheduled(count) => {
                assert!(count > 0);
                saw_notifications = true;
            }
            _ => {}
        }
    }

    let scheduled = state.db.get_scheduled_alarms().await.unwrap();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].alarm_type, "fajr");

    state.shutdown.cancel();
    timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop after shutdown signal")
        .unwrap();
}

#[tokio::test]
async fn test_monitor_surfaces_challenge_before_scheduling() {
    let state = create_test_state().await;

    // Seed an alarm that already fired; the bridge reports it as a pending
    // challenge on the first cycle.
    let alarm = ScheduledAlarm::new(
        "ritual-1".to_string(),
        AlarmType::Custom,
        "Custom alarm".to_string(),
        Utc::now() - Duration::minutes(5),
    );
    state.db.schedule_alarm(&alarm).await.unwrap();
    state.alarms.register_alarm(&alarm).await.unwrap();

    let (tx, mut rx) = mpsc::channel::<MonitorEvent>(32);
    let handle = tokio::spawn(run_monitor(
        state.clone(),
        StaticProvider,
        chrono_tz::UTC,
        Some(tx),
    ));

    let event = timeout(std::time::Duration::from_secs(5), rx.recv())
        .await
        .expect("monitor event timed out")
        .expect("monitor channel closed");

    match event {
        MonitorEvent::ChallengeDetected(active) => {
            assert_eq!(active.alarm_id, "ritual-1");
            assert_eq!(active.source, ActiveAlarmSource::PendingChallenge);
        }
        other => panic!("Expected challenge first, got {:?}", other),
    }

    // The challenge cycle schedules nothing
    assert_eq!(state.db.get_scheduled_alarms().await.unwrap().len(), 1);

    state.shutdown.cancel();
    timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop after shutdown signal")
        .unwrap();
}
