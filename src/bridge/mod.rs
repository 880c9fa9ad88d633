// Native platform boundary.
// Alarm firing and notification delivery belong to the host platform; the app
// only ever talks to these traits. Timestamp units on reported challenges are
// platform-dependent and normalized by the caller.

use crate::models::{
    CompletedQueueEntry, PendingChallenge, PermissionStatus, ScheduledAlarm,
    ScheduledNotification,
};
use anyhow::Result;
use async_trait::async_trait;

pub mod local;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlarmBridge: Send + Sync {
    /// The single in-flight alarm awaiting user acknowledgment, if any.
    async fn get_pending_challenge(&self) -> Result<Option<PendingChallenge>>;

    /// Alarms the device already resolved. Used purely as an exclusion set.
    async fn get_completed_queue(&self) -> Result<Vec<CompletedQueueEntry>>;

    async fn register_alarm(&self, alarm: &ScheduledAlarm) -> Result<()>;

    async fn complete_alarm(&self, alarm_id: &str) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationBridge: Send + Sync {
    async fn query_permission(&self) -> Result<PermissionStatus>;

    /// Prompt the user; resolves to the post-prompt status.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    async fn schedule(&self, notification: &ScheduledNotification) -> Result<()>;

    async fn cancel(&self, notification_id: &str) -> Result<()>;

    async fn cancel_all(&self) -> Result<()>;
}
