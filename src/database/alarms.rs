// file: src/database/alarms.rs
use anyhow::Result;
use sqlx::SqlitePool;

pub async fn insert(pool: &SqlitePool, alarm: &crate::models::ScheduledAlarm) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO alarms (alarm_id, alarm_type, title, trigger_time, is_completed,
                            snooze_count, last_snoozed_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&alarm.alarm_id)
    .bind(&alarm.alarm_type)
    .bind(&alarm.title)
    .bind(alarm.trigger_time)
    .bind(alarm.is_completed)
    .bind(alarm.snooze_count)
    .bind(alarm.last_snoozed_at)
    .bind(alarm.created_at)
    .bind(alarm.updated_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All alarms still in the scheduled state, earliest trigger first. The
/// detector relies on this ordering for its past-due tie-break.
pub async fn get_scheduled(pool: &SqlitePool) -> Result<Vec<crate::models::ScheduledAlarm>> {
    let alarms = sqlx::query_as::<_, crate::models::ScheduledAlarm>(
        r#"
        SELECT id, alarm_id, alarm_type, title, trigger_time, is_completed,
               snooze_count, last_snoozed_at, created_at, updated_at
        FROM alarms
        WHERE is_completed = 0
        ORDER BY trigger_time ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(alarms)
}

pub async fn get_by_alarm_id(
    pool: &SqlitePool,
    alarm_id: &str,
) -> Result<Option<crate::models::ScheduledAlarm>> {
    let alarm = sqlx::query_as::<_, crate::models::ScheduledAlarm>(
        r#"
        SELECT id, alarm_id, alarm_type, title, trigger_time, is_completed,
               snooze_count, last_snoozed_at, created_at, updated_at
        FROM alarms
        WHERE alarm_id = ?
        "#,
    )
    .bind(alarm_id)
    .fetch_optional(pool)
    .await?;

    Ok(alarm)
}

/// Idempotent: completing an unknown or already-completed alarm is a no-op.
pub async fn complete(pool: &SqlitePool, alarm_id: &str) -> Result<()> {
    sqlx::query("UPDATE alarms SET is_completed = 1 WHERE alarm_id = ?")
        .bind(alarm_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn remove(pool: &SqlitePool, alarm_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM alarms WHERE alarm_id = ?")
        .bind(alarm_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Push the trigger forward without leaving the scheduled state. Bounded by
/// max_snoozes; exceeding the bound is an error the caller surfaces.
pub async fn snooze(
    pool: &SqlitePool,
    alarm_id: &str,
    snooze_minutes: i32,
    max_snoozes: i32,
) -> Result<chrono::DateTime<chrono::Utc>> {
    let alarm = get_by_alarm_id(pool, alarm_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Alarm not found: {}", alarm_id))?;

    if alarm.is_completed {
        return Err(anyhow::anyhow!("Cannot snooze a completed alarm"));
    }
    if alarm.snooze_count >= max_snoozes {
        return Err(anyhow::anyhow!("Maximum snooze limit reached"));
    }

    let now = chrono::Utc::now();
    let new_trigger = now + chrono::Duration::minutes(snooze_minutes as i64);

    sqlx::query(
        r#"
        UPDATE alarms
        SET trigger_time = ?, snooze_count = snooze_count + 1, last_snoozed_at = ?
        WHERE alarm_id = ?
        "#,
    )
    .bind(new_trigger)
    .bind(now)
    .bind(alarm_id)
    .execute(pool)
    .await?;

    Ok(new_trigger)
}
