use chrono::{Duration, Utc};
use minaret::models::{AlarmType, PermissionStatus, ScheduledAlarm, Settings};
use minaret::Database;
use sqlx::SqlitePool;
use tempfile::NamedTempFile;

async fn create_test_database() -> (Database, String) {
    let temp_file = NamedTempFile::new().unwrap();
    let (_, path) = temp_file.keep().unwrap();
    let db_path = format!("sqlite:{}", path.to_str().unwrap());

    let pool = SqlitePool::connect(&db_path).await.unwrap();
    minaret::database::run_schema(&pool).await.unwrap();

    (Database { pool }, db_path)
}

fn test_alarm(alarm_id: &str, offset_minutes: i64) -> ScheduledAlarm {
    ScheduledAlarm::new(
        alarm_id.to_string(),
        AlarmType::Fajr,
        "Fajr prayer".to_string(),
        Utc::now() + Duration::minutes(offset_minutes),
    )
}

#[tokio::test]
async fn test_alarm_survives_reconnect() {
    let (db, db_path) = create_test_database().await;
    db.schedule_alarm(&test_alarm("persist-1", 90)).await.unwrap();
    db.pool.close().await;

    // Fresh connection to the same file sees the alarm
    let pool = SqlitePool::connect(&db_path).await.unwrap();
    let reopened = Database { pool };

    let scheduled = reopened.get_scheduled_alarms().await.unwrap();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].alarm_id, "persist-1");
}

#[tokio::test]
async fn test_completion_survives_reconnect() {
    let (db, db_path) = create_test_database().await;
    db.schedule_alarm(&test_alarm("persist-1", -30)).await.unwrap();
    db.complete_alarm("persist-1").await.unwrap();
    db.pool.close().await;

    let pool = SqlitePool::connect(&db_path).await.unwrap();
    let reopened = Database { pool };

    assert!(reopened.get_scheduled_alarms().await.unwrap().is_empty());
    let alarm = reopened.get_alarm("persist-1").await.unwrap().unwrap();
    assert!(alarm.is_completed);
}

#[tokio::test]
async fn test_notification_permission_survives_reconnect() {
    let (db, db_path) = create_test_database().await;
    db.set_notification_permission(PermissionStatus::Denied)
        .await
        .unwrap();
    db.pool.close().await;

    let pool = SqlitePool::connect(&db_path).await.unwrap();
    let reopened = Database { pool };

    assert_eq!(
        reopened.get_notification_permission().await.unwrap(),
        PermissionStatus::Denied
    );
}

#[tokio::test]
async fn test_settings_survive_reconnect() {
    let (db, db_path) = create_test_database().await;
    let mut settings = Settings::default();
    settings.snooze_minutes = 5;
    settings.fajr_alarm = false;
    db.update_settings(&settings).await.unwrap();
    db.pool.close().await;

    let pool = SqlitePool::connect(&db_path).await.unwrap();
    let reopened = Database { pool };

    let reloaded = reopened.get_settings().await.unwrap();
    assert_eq!(reloaded.snooze_minutes, 5);
    assert!(!reloaded.fajr_alarm);
}

#[tokio::test]
async fn test_duplicate_alarm_id_rejected() {
    let (db, _) = create_test_database().await;
    db.schedule_alarm(&test_alarm("dup-1", 30)).await.unwrap();

    let result = db.schedule_alarm(&test_alarm("dup-1", 45)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_scheduled_ordering_after_snooze() {
    let (db, _) = create_test_database().await;
    db.schedule_alarm(&test_alarm("first", -5)).await.unwrap();
    db.schedule_alarm(&test_alarm("second", 2)).await.unwrap();

    // Snoozing pushes "first" past "second" (default snooze is 10 minutes)
    db.snooze_alarm("first").await.unwrap();

    let scheduled = db.get_scheduled_alarms().await.unwrap();
    assert_eq!(scheduled[0].alarm_id, "second");
    assert_eq!(scheduled[1].alarm_id, "first");
}

#[tokio::test]
async fn test_snooze_respects_configured_bound() {
    let (db, _) = create_test_database().await;

    let mut settings = Settings::default();
    settings.max_snoozes = 1;
    db.update_settings(&settings).await.unwrap();

    db.schedule_alarm(&test_alarm("a-1", -1)).await.unwrap();
    db.snooze_alarm("a-1").await.unwrap();

    let result = db.snooze_alarm("a-1").await;
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Maximum snooze limit"));
}
