// file: src/models/alarm.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmType {
    Fajr,
    Jummah,
    Custom,
}

impl AlarmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmType::Fajr => "fajr",
            AlarmType::Jummah => "jummah",
            AlarmType::Custom => "custom",
        }
    }
}

/// A ritual alarm registered with the native alarm subsystem and persisted by
/// the alarm store. Lifecycle: scheduled -> completed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledAlarm {
    pub id: Option<i64>,
    pub alarm_id: String,
    pub alarm_type: String,
    pub title: String,
    pub trigger_time: DateTime<Utc>,
    pub is_completed: bool,
    pub snooze_count: i32,
    pub last_snoozed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledAlarm {
    pub fn new(
        alarm_id: String,
        alarm_type: AlarmType,
        title: String,
        trigger_time: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            alarm_id,
            alarm_type: alarm_type.as_str().to_string(),
            title,
            trigger_time,
            is_completed: false,
            snooze_count: 0,
            last_snoozed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn alarm_type(&self) -> Result<AlarmType, String> {
        match self.alarm_type.as_str() {
            "fajr" => Ok(AlarmType::Fajr),
            "jummah" => Ok(AlarmType::Jummah),
            "custom" => Ok(AlarmType::Custom),
            _ => Err(format!("Unknown alarm type: {}", self.alarm_type)),
        }
    }

    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.trigger_time <= now
    }

    /// Milliseconds elapsed since the trigger time; negative while still ahead.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis() - self.trigger_time.timestamp_millis()
    }
}
