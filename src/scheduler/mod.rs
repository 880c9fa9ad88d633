// Alarm scheduling.
// Resolves the next trigger for a named prayer and registers it with the
// store and the native bridge. Single attempt; failures are logged and
// reported as `None` so callers degrade instead of assuming an alarm exists.

use crate::bridge::AlarmBridge;
use crate::database::Database;
use crate::models::{AlarmType, DayTimings, Prayer, ScheduledAlarm};
use crate::utils;
use crate::utils::logging;
use chrono::{DateTime, Utc};
use log::{error, warn};
use std::sync::Arc;
use uuid::Uuid;

/// Today's timing if still ahead, else tomorrow's, else nothing.
pub fn next_prayer_time(
    prayer: Prayer,
    today: &DayTimings,
    tomorrow: Option<&DayTimings>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if let Some(at) = today.get(prayer) {
        if at > now {
            return Some(at);
        }
    }

    tomorrow.and_then(|t| t.get(prayer)).filter(|at| *at > now)
}

/// Jummah is dhuhr on Friday; only today and tomorrow are in reach, which is
/// all the monitor needs since it re-runs daily.
pub fn next_jummah_time(
    today: &DayTimings,
    tomorrow: Option<&DayTimings>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if utils::is_jummah_day(today.date) {
        if let Some(at) = today.get(Prayer::Dhuhr) {
            if at > now {
                return Some(at);
            }
        }
    }

    tomorrow
        .filter(|t| utils::is_jummah_day(t.date))
        .and_then(|t| t.get(Prayer::Dhuhr))
        .filter(|at| *at > now)
}

pub struct AlarmScheduler {
    db: Arc<Database>,
    bridge: Arc<dyn AlarmBridge>,
}

impl AlarmScheduler {
    pub fn new(db: Arc<Database>, bridge: Arc<dyn AlarmBridge>) -> Self {
        Self { db, bridge }
    }

    /// Schedule a ritual alarm for the next occurrence of a prayer.
    ///
    /// Returns the fresh alarm id, or `None` when no trigger is resolvable or
    /// registration fails. Never leaves a store row without a matching native
    /// registration.
    pub async fn schedule_prayer_alarm(
        &self,
        prayer: Prayer,
        alarm_type: AlarmType,
        today: &DayTimings,
        tomorrow: Option<&DayTimings>,
    ) -> Option<String> {
        let now = Utc::now();
        let trigger = match alarm_type {
            AlarmType::Jummah => next_jummah_time(today, tomorrow, now),
            _ => next_prayer_time(prayer, today, tomorrow, now),
        };

        let Some(trigger_time) = trigger else {
            error!(
                "No trigger time resolvable for {} ({} alarm)",
                prayer.as_str(),
                alarm_type.as_str()
            );
            return None;
        };

        let alarm_id = Uuid::new_v4().to_string();
        let title = match alarm_type {
            AlarmType::Jummah => "Jummah prayer".to_string(),
            _ => format!("{} prayer", prayer.display_name()),
        };
        let alarm = ScheduledAlarm::new(alarm_id.clone(), alarm_type, title, trigger_time);

        if let Err(e) = self.db.schedule_alarm(&alarm).await {
            logging::log_error_with_context(&e, "schedule_prayer_alarm");
            return None;
        }

        if let Err(e) = self.bridge.register_alarm(&alarm).await {
            logging::log_error_with_context(&e, "schedule_prayer_alarm");
            if let Err(e) = self.db.remove_alarm(&alarm_id).await {
                warn!("Failed to roll back unregistered alarm {}: {}", alarm_id, e);
            }
            return None;
        }

        logging::log_alarm_event("scheduled", &alarm_id);
        Some(alarm_id)
    }

    /// Whether a non-completed alarm of this type is still ahead. The monitor
    /// uses this to avoid piling up duplicate registrations.
    pub async fn has_upcoming(
        &self,
        alarm_type: AlarmType,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let scheduled = self.db.get_scheduled_alarms().await?;
        Ok(scheduled.iter().any(|alarm| {
            alarm.trigger_time > now
                && alarm
                    .alarm_type()
                    .map(|t| t == alarm_type)
                    .unwrap_or(false)
        }))
    }
}
