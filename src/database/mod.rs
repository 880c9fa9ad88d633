// file: src/database/mod.rs

use anyhow::{Context, Result};
use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Row, Sqlite};

// Declare submodules
pub mod alarms;
pub mod notifications;
pub mod settings;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new() -> Result<Self> {
        let db_path = default_db_path();

        let db_exists = Sqlite::database_exists(&db_path)
            .await
            .context("Failed to check if database exists")?;
        if !db_exists {
            info!("Creating database");
            Sqlite::create_database(&db_path)
                .await
                .context("Failed to create database")?;
        }

        let pool = SqlitePool::connect(&db_path)
            .await
            .context("Failed to connect to database")?;

        run_schema(&pool)
            .await
            .context("Failed to run database schema")?;

        ensure_migrations(&pool)
            .await
            .context("Failed to ensure migrations")?;

        info!("Database initialized successfully");

        Ok(Database { pool })
    }

    // --- Alarm Delegates ---

    pub async fn get_scheduled_alarms(&self) -> Result<Vec<crate::models::ScheduledAlarm>> {
        alarms::get_scheduled(&self.pool).await
    }

    pub async fn get_alarm(
        &self,
        alarm_id: &str,
    ) -> Result<Option<crate::models::ScheduledAlarm>> {
        alarms::get_by_alarm_id(&self.pool, alarm_id).await
    }

    pub async fn schedule_alarm(&self, alarm: &crate::models::ScheduledAlarm) -> Result<i64> {
        alarms::insert(&self.pool, alarm).await
    }

    pub async fn complete_alarm(&self, alarm_id: &str) -> Result<()> {
        alarms::complete(&self.pool, alarm_id).await
    }

    pub async fn remove_alarm(&self, alarm_id: &str) -> Result<()> {
        alarms::remove(&self.pool, alarm_id).await
    }

    pub async fn snooze_alarm(
        &self,
        alarm_id: &str,
    ) -> Result<chrono::DateTime<chrono::Utc>> {
        let settings = self.get_settings().await?;
        alarms::snooze(
            &self.pool,
            alarm_id,
            settings.snooze_minutes,
            settings.max_snoozes,
        )
        .await
    }

    // --- Settings Delegates ---

    pub async fn get_settings(&self) -> Result<crate::models::Settings> {
        settings::get(&self.pool).await
    }

    pub async fn update_settings(&self, settings: &crate::models::Settings) -> Result<()> {
        settings::update(&self.pool, settings).await
    }

    // --- Notification Delegates ---

    pub async fn get_pending_notifications(
        &self,
    ) -> Result<Vec<crate::models::ScheduledNotification>> {
        notifications::get_pending(&self.pool).await
    }

    pub async fn replace_pending_notifications(
        &self,
        pending: &[crate::models::ScheduledNotification],
    ) -> Result<()> {
        notifications::replace_pending(&self.pool, pending).await
    }

    pub async fn clear_pending_notifications(&self) -> Result<()> {
        notifications::clear(&self.pool).await
    }

    pub async fn get_notification_permission(&self) -> Result<crate::models::PermissionStatus> {
        notifications::get_permission(&self.pool).await
    }

    pub async fn set_notification_permission(
        &self,
        status: crate::models::PermissionStatus,
    ) -> Result<()> {
        notifications::set_permission(&self.pool, status).await
    }
}

fn default_db_path() -> String {
    let dir = dirs::data_dir()
        .map(|d| d.join("minaret"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    if !dir.exists() {
        let _ = std::fs::create_dir_all(&dir);
    }

    format!("sqlite:{}?mode=rwc", dir.join("minaret.db").display())
}

pub async fn run_schema(pool: &SqlitePool) -> Result<()> {
    let schema = include_str!("schema.sql");

    // Statements end at ';', except inside a trigger body where the
    // terminator is the trailing 'END;'.
    let mut current_statement = String::new();
    let mut in_trigger = false;

    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        if trimmed.to_uppercase().starts_with("CREATE TRIGGER") {
            in_trigger = true;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            if in_trigger {
                if trimmed.to_uppercase() == "END;" {
                    in_trigger = false;
                    sqlx::query(&current_statement).execute(pool).await?;
                    current_statement.clear();
                }
            } else {
                sqlx::query(&current_statement).execute(pool).await?;
                current_statement.clear();
            }
        }
    }
    Ok(())
}

async fn ensure_migrations(pool: &SqlitePool) -> Result<()> {
    // Check columns in alarms table
    let rows = sqlx::query("PRAGMA table_info(alarms)")
        .fetch_all(pool)
        .await
        .context("Failed to fetch table info")?;

    let columns: Vec<String> = rows
        .iter()
        .map(|row| row.get::<String, _>("name"))
        .collect();

    if !columns.contains(&"snooze_count".to_string()) {
        info!("Migrating: Adding snooze_count column to alarms table");
        sqlx::query("ALTER TABLE alarms ADD COLUMN snooze_count INTEGER NOT NULL DEFAULT 0")
            .execute(pool)
            .await
            .context("Failed to add snooze_count column")?;
    }

    if !columns.contains(&"last_snoozed_at".to_string()) {
        info!("Migrating: Adding last_snoozed_at column to alarms table");
        sqlx::query("ALTER TABLE alarms ADD COLUMN last_snoozed_at DATETIME")
            .execute(pool)
            .await
            .context("Failed to add last_snoozed_at column")?;
    }

    Ok(())
}
