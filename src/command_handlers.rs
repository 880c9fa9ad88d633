//! Command handlers module
//!
//! Async handlers for user-initiated actions (dismiss, snooze, settings
//! updates), kept out of the UI layer for testability.

use crate::bridge::AlarmBridge;
use crate::database::Database;
use crate::error::AppError;
use crate::models::{ScheduledAlarm, Settings};
use log::{info, warn};
use std::sync::Arc;

/// Alarm operation handlers
pub struct AlarmHandlers {
    pub db: Database,
    pub bridge: Arc<dyn AlarmBridge>,
}

impl AlarmHandlers {
    pub fn new(db: Database, bridge: Arc<dyn AlarmBridge>) -> Self {
        Self { db, bridge }
    }

    /// Load scheduled alarms for display
    pub async fn load_alarms(&self) -> Result<Vec<ScheduledAlarm>, AppError> {
        info!("Loading scheduled alarms");
        let alarms = self.db.get_scheduled_alarms().await?;

        info!("Loaded {} scheduled alarms", alarms.len());
        Ok(alarms)
    }

    /// User dismissal: complete in the store and mirror to the bridge.
    pub async fn dismiss_alarm(&self, alarm_id: &str) -> Result<(), AppError> {
        info!("Dismissing alarm: {}", alarm_id);

        self.db.complete_alarm(alarm_id).await?;
        if let Err(e) = self.bridge.complete_alarm(alarm_id).await {
            warn!("Failed to report dismissal to bridge for {}: {}", alarm_id, e);
        }

        Ok(())
    }

    /// Snooze: push the trigger forward in the store, then re-register the
    /// updated alarm so the native side fires again.
    pub async fn snooze_alarm(
        &self,
        alarm_id: &str,
    ) -> Result<chrono::DateTime<chrono::Utc>, AppError> {
        info!("Snoozing alarm: {}", alarm_id);

        let new_trigger = self.db.snooze_alarm(alarm_id).await?;

        let alarm = self
            .db
            .get_alarm(alarm_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Alarm not found: {}", alarm_id)))?;

        self.bridge
            .register_alarm(&alarm)
            .await
            .map_err(|e| AppError::bridge(format!("Failed to re-register alarm: {}", e)))?;

        info!("Alarm {} snoozed until {}", alarm_id, new_trigger);
        Ok(new_trigger)
    }
}

/// Settings operation handlers
pub struct SettingsHandlers {
    pub db: Database,
}

impl SettingsHandlers {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn load_settings(&self) -> Result<Settings, AppError> {
        self.db.get_settings().await.map_err(AppError::Anyhow)
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<(), AppError> {
        info!("Updating settings");
        self.db
            .update_settings(settings)
            .await
            .map_err(AppError::Anyhow)
    }
}

/// Command handler factory
pub struct CommandHandlers {
    pub alarms: AlarmHandlers,
    pub settings: SettingsHandlers,
}

impl CommandHandlers {
    pub fn new(db: &Arc<Database>, bridge: &Arc<dyn AlarmBridge>) -> Self {
        Self {
            alarms: AlarmHandlers::new(db.as_ref().clone(), bridge.clone()),
            settings: SettingsHandlers::new(db.as_ref().clone()),
        }
    }
}
