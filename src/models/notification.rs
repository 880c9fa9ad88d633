// file: src/models/notification.rs
use super::timings::Prayer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tri-state result of the platform notification permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Undetermined => "undetermined",
        }
    }

    pub fn from_name(name: &str) -> Option<PermissionStatus> {
        match name {
            "granted" => Some(PermissionStatus::Granted),
            "denied" => Some(PermissionStatus::Denied),
            "undetermined" => Some(PermissionStatus::Undetermined),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Athan,
    Iqama,
    PreAthan,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Athan => "athan",
            NotificationKind::Iqama => "iqama",
            NotificationKind::PreAthan => "pre_athan",
        }
    }
}

/// A local notification registered with the platform for an upcoming prayer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledNotification {
    pub id: Option<i64>,
    pub notification_id: String,
    pub kind: String,
    pub prayer: String,
    pub title: String,
    pub fire_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ScheduledNotification {
    pub fn new(
        kind: NotificationKind,
        prayer: Prayer,
        title: String,
        fire_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            notification_id: uuid::Uuid::new_v4().to_string(),
            kind: kind.as_str().to_string(),
            prayer: prayer.as_str().to_string(),
            title,
            fire_time,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> Result<NotificationKind, String> {
        match self.kind.as_str() {
            "athan" => Ok(NotificationKind::Athan),
            "iqama" => Ok(NotificationKind::Iqama),
            "pre_athan" => Ok(NotificationKind::PreAthan),
            _ => Err(format!("Unknown notification kind: {}", self.kind)),
        }
    }

    pub fn prayer(&self) -> Option<Prayer> {
        Prayer::from_name(&self.prayer)
    }
}
