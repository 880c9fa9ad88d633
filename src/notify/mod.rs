// Prayer notification scheduling.
// Independent of the ritual alarms: registers lightweight local notifications
// for athan / iqama / pre-athan reminders. Only the permission sub-state is
// persisted; scheduling flags live and die with the process.

use crate::bridge::NotificationBridge;
use crate::database::Database;
use crate::models::{
    DayTimings, NotificationKind, PermissionStatus, Prayer, ScheduledNotification, Settings,
};
use crate::utils::logging;
use anyhow::Result;
use chrono::{Duration, Utc};
use log::{info, warn};
use std::sync::Arc;

pub struct NotificationScheduler {
    db: Arc<Database>,
    bridge: Arc<dyn NotificationBridge>,
}

impl NotificationScheduler {
    pub fn new(db: Arc<Database>, bridge: Arc<dyn NotificationBridge>) -> Self {
        Self { db, bridge }
    }

    /// Resolve the effective permission, prompting once while undetermined.
    /// The result is persisted so a restart remembers a settled prompt.
    pub async fn ensure_permission(&self) -> PermissionStatus {
        let queried = match self.bridge.query_permission().await {
            Ok(status) => status,
            Err(e) => {
                warn!("Notification permission query failed: {}", e);
                return self
                    .db
                    .get_notification_permission()
                    .await
                    .unwrap_or(PermissionStatus::Undetermined);
            }
        };

        let status = if queried == PermissionStatus::Undetermined {
            match self.bridge.request_permission().await {
                Ok(status) => status,
                Err(e) => {
                    warn!("Notification permission request failed: {}", e);
                    PermissionStatus::Undetermined
                }
            }
        } else {
            queried
        };

        if let Err(e) = self.db.set_notification_permission(status).await {
            logging::log_error_with_context(&e, "ensure_permission");
        }

        status
    }

    /// Replace the registered reminder set for the day's remaining prayers.
    /// Denied permission degrades to no reminders; it is never an error.
    pub async fn reconcile(&self, timings: &DayTimings, settings: &Settings) -> Result<usize> {
        let permission = self.ensure_permission().await;
        if permission != PermissionStatus::Granted {
            info!(
                "Notification permission {}; running without reminders",
                permission.as_str()
            );
            if let Err(e) = self.bridge.cancel_all().await {
                warn!("Failed to cancel stale notifications: {}", e);
            }
            self.db.clear_pending_notifications().await?;
            return Ok(0);
        }

        // Wholesale replacement: drop everything registered last pass first.
        for previous in self.db.get_pending_notifications().await? {
            if let Err(e) = self.bridge.cancel(&previous.notification_id).await {
                warn!(
                    "Failed to cancel notification {}: {}",
                    previous.notification_id, e
                );
            }
        }

        let now = Utc::now();
        let mut registered = Vec::new();

        for prayer in Prayer::OBLIGATORY {
            let Some(athan_at) = timings.get(prayer) else {
                continue;
            };

            let mut planned = Vec::new();
            if settings.athan_alert {
                planned.push((
                    NotificationKind::Athan,
                    athan_at,
                    format!("{} athan", prayer.display_name()),
                ));
            }
            if settings.pre_athan_alert {
                planned.push((
                    NotificationKind::PreAthan,
                    athan_at - Duration::minutes(settings.pre_athan_minutes as i64),
                    format!(
                        "{} in {} minutes",
                        prayer.display_name(),
                        settings.pre_athan_minutes
                    ),
                ));
            }
            if settings.iqama_alert {
                planned.push((
                    NotificationKind::Iqama,
                    athan_at + Duration::minutes(settings.iqama_minutes as i64),
                    format!("{} iqama", prayer.display_name()),
                ));
            }

            for (kind, fire_time, title) in planned {
                if fire_time <= now {
                    continue;
                }
                let notification = ScheduledNotification::new(kind, prayer, title, fire_time);
                match self.bridge.schedule(&notification).await {
                    Ok(()) => registered.push(notification),
                    Err(e) => warn!(
                        "Failed to schedule {} notification for {}: {}",
                        kind.as_str(),
                        prayer.as_str(),
                        e
                    ),
                }
            }
        }

        self.db.replace_pending_notifications(&registered).await?;
        info!("Registered {} prayer notifications", registered.len());
        Ok(registered.len())
    }
}
