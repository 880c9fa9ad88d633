use chrono::{Duration, NaiveDate, Utc};
use minaret::bridge::local::LocalNotifier;
use minaret::models::{DayTimings, PermissionStatus, Prayer, Settings};
use minaret::{Database, NotificationScheduler};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::NamedTempFile;

async fn create_test_database() -> Arc<Database> {
    let temp_file = NamedTempFile::new().unwrap();
    let (_, path) = temp_file.keep().unwrap();
    let db_path = format!("sqlite:{}", path.to_str().unwrap());

    let pool = SqlitePool::connect(&db_path).await.unwrap();
    minaret::database::run_schema(&pool).await.unwrap();

    Arc::new(Database { pool })
}

fn full_day_timings() -> DayTimings {
    let now = Utc::now();
    let mut timings = DayTimings::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    for (i, prayer) in Prayer::OBLIGATORY.iter().enumerate() {
        timings.insert(*prayer, now + Duration::hours(i as i64 + 1));
    }
    timings
}

#[tokio::test]
async fn test_granted_permission_schedules_reminders() {
    let db = create_test_database().await;
    let notifier = Arc::new(LocalNotifier::with_permission(PermissionStatus::Granted));
    let scheduler = NotificationScheduler::new(db.clone(), notifier.clone());

    let count = scheduler
        .reconcile(&full_day_timings(), &Settings::default())
        .await
        .unwrap();

    assert_eq!(count, 5);
    assert_eq!(notifier.scheduled_count().await, 5);
    assert_eq!(db.get_pending_notifications().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_undetermined_permission_prompts_then_schedules() {
    let db = create_test_database().await;
    // LocalNotifier grants on request
    let notifier = Arc::new(LocalNotifier::new());
    let scheduler = NotificationScheduler::new(db.clone(), notifier.clone());

    let count = scheduler
        .reconcile(&full_day_timings(), &Settings::default())
        .await
        .unwrap();

    assert_eq!(count, 5);
    assert_eq!(
        db.get_notification_permission().await.unwrap(),
        PermissionStatus::Granted
    );
}

#[tokio::test]
async fn test_denied_permission_runs_degraded() {
    let db = create_test_database().await;
    let notifier = Arc::new(LocalNotifier::with_permission(PermissionStatus::Denied));
    let scheduler = NotificationScheduler::new(db.clone(), notifier.clone());

    let count = scheduler
        .reconcile(&full_day_timings(), &Settings::default())
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert_eq!(notifier.scheduled_count().await, 0);
    assert!(db.get_pending_notifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reconcile_replaces_previous_registrations() {
    let db = create_test_database().await;
    let notifier = Arc::new(LocalNotifier::with_permission(PermissionStatus::Granted));
    let scheduler = NotificationScheduler::new(db.clone(), notifier.clone());

    scheduler
        .reconcile(&full_day_timings(), &Settings::default())
        .await
        .unwrap();
    let first_pass = db.get_pending_notifications().await.unwrap();

    scheduler
        .reconcile(&full_day_timings(), &Settings::default())
        .await
        .unwrap();
    let second_pass = db.get_pending_notifications().await.unwrap();

    // Same size, fully fresh ids
    assert_eq!(first_pass.len(), second_pass.len());
    for old in &first_pass {
        assert!(!second_pass
            .iter()
            .any(|n| n.notification_id == old.notification_id));
    }
}

#[tokio::test]
async fn test_iqama_and_pre_athan_offsets() {
    let db = create_test_database().await;
    let notifier = Arc::new(LocalNotifier::with_permission(PermissionStatus::Granted));
    let scheduler = NotificationScheduler::new(db.clone(), notifier);

    let athan_at = Utc::now() + Duration::hours(2);
    let mut timings = DayTimings::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    timings.insert(Prayer::Maghrib, athan_at);

    let mut settings = Settings::default();
    settings.pre_athan_alert = true;
    settings.iqama_alert = true;

    scheduler.reconcile(&timings, &settings).await.unwrap();

    let pending = db.get_pending_notifications().await.unwrap();
    assert_eq!(pending.len(), 3);

    // Ordered by fire time: pre-athan, athan, iqama
    assert_eq!(pending[0].kind, "pre_athan");
    assert_eq!(
        pending[0].fire_time,
        athan_at - Duration::minutes(settings.pre_athan_minutes as i64)
    );
    assert_eq!(pending[1].kind, "athan");
    assert_eq!(pending[1].fire_time, athan_at);
    assert_eq!(pending[2].kind, "iqama");
    assert_eq!(
        pending[2].fire_time,
        athan_at + Duration::minutes(settings.iqama_minutes as i64)
    );
}
