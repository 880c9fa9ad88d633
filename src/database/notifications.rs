// file: src/database/notifications.rs
// Notification persistence is partial: registered notification rows and the
// permission sub-state survive restarts; transient scheduling flags never do.
use anyhow::Result;
use sqlx::SqlitePool;

use crate::models::{PermissionStatus, ScheduledNotification};

const PERMISSION_KEY: &str = "notification_permission";

pub async fn get_pending(pool: &SqlitePool) -> Result<Vec<ScheduledNotification>> {
    let notifications = sqlx::query_as::<_, ScheduledNotification>(
        r#"
        SELECT id, notification_id, kind, prayer, title, fire_time, created_at
        FROM notifications
        ORDER BY fire_time ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

/// Swap the full registered set in one transaction; a reconcile pass always
/// replaces everything it previously registered.
pub async fn replace_pending(
    pool: &SqlitePool,
    notifications: &[ScheduledNotification],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM notifications")
        .execute(&mut *tx)
        .await?;

    for n in notifications {
        sqlx::query(
            r#"
            INSERT INTO notifications (notification_id, kind, prayer, title, fire_time, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&n.notification_id)
        .bind(&n.kind)
        .bind(&n.prayer)
        .bind(&n.title)
        .bind(n.fire_time)
        .bind(n.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn clear(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM notifications").execute(pool).await?;
    Ok(())
}

pub async fn get_permission(pool: &SqlitePool) -> Result<PermissionStatus> {
    let stored = super::settings::get_raw(pool, PERMISSION_KEY).await?;

    Ok(stored
        .and_then(|v| PermissionStatus::from_name(&v))
        .unwrap_or(PermissionStatus::Undetermined))
}

pub async fn set_permission(pool: &SqlitePool, status: PermissionStatus) -> Result<()> {
    super::settings::set_raw(pool, PERMISSION_KEY, status.as_str()).await
}
