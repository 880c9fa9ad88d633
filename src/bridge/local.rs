#![allow(dead_code)]
// In-process bridge implementations backing headless runs and integration
// tests. Registered alarms surface as pending challenges once their trigger
// time elapses, which is how the native subsystems behave.

use super::{AlarmBridge, NotificationBridge};
use crate::models::{
    AlarmType, CompletedQueueEntry, PendingChallenge, PermissionStatus, ScheduledAlarm,
    ScheduledNotification, TimestampUnit,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct LocalAlarmState {
    registered: HashMap<String, ScheduledAlarm>,
    completed: Vec<CompletedQueueEntry>,
}

#[derive(Default)]
pub struct LocalBridge {
    state: RwLock<LocalAlarmState>,
}

impl LocalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn registered_count(&self) -> usize {
        self.state.read().await.registered.len()
    }

    /// Test hook: report an alarm as resolved without going through
    /// `complete_alarm`, mimicking stale device state.
    pub async fn push_completed(&self, alarm_id: &str) {
        self.state.write().await.completed.push(CompletedQueueEntry {
            alarm_id: alarm_id.to_string(),
        });
    }
}

#[async_trait]
impl AlarmBridge for LocalBridge {
    async fn get_pending_challenge(&self) -> Result<Option<PendingChallenge>> {
        let state = self.state.read().await;
        let now = Utc::now();

        let challenge = state
            .registered
            .values()
            .filter(|alarm| alarm.trigger_time <= now)
            .filter(|alarm| {
                !state
                    .completed
                    .iter()
                    .any(|entry| entry.alarm_id == alarm.alarm_id)
            })
            .min_by_key(|alarm| alarm.trigger_time)
            .map(|alarm| PendingChallenge {
                alarm_id: alarm.alarm_id.clone(),
                alarm_type: alarm.alarm_type().unwrap_or(AlarmType::Custom),
                title: alarm.title.clone(),
                timestamp: alarm.trigger_time.timestamp_millis(),
                unit: Some(TimestampUnit::Milliseconds),
            });

        Ok(challenge)
    }

    async fn get_completed_queue(&self) -> Result<Vec<CompletedQueueEntry>> {
        Ok(self.state.read().await.completed.clone())
    }

    async fn register_alarm(&self, alarm: &ScheduledAlarm) -> Result<()> {
        let mut state = self.state.write().await;
        state.registered.insert(alarm.alarm_id.clone(), alarm.clone());
        Ok(())
    }

    async fn complete_alarm(&self, alarm_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.registered.remove(alarm_id);
        if !state
            .completed
            .iter()
            .any(|entry| entry.alarm_id == alarm_id)
        {
            state.completed.push(CompletedQueueEntry {
                alarm_id: alarm_id.to_string(),
            });
        }
        Ok(())
    }
}

struct LocalNotifierState {
    permission: PermissionStatus,
    scheduled: HashMap<String, ScheduledNotification>,
}

/// Notification stand-in that grants permission on request and records what
/// would have been delivered.
pub struct LocalNotifier {
    state: RwLock<LocalNotifierState>,
}

impl LocalNotifier {
    pub fn new() -> Self {
        Self::with_permission(PermissionStatus::Undetermined)
    }

    pub fn with_permission(permission: PermissionStatus) -> Self {
        Self {
            state: RwLock::new(LocalNotifierState {
                permission,
                scheduled: HashMap::new(),
            }),
        }
    }

    pub async fn scheduled_count(&self) -> usize {
        self.state.read().await.scheduled.len()
    }
}

impl Default for LocalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationBridge for LocalNotifier {
    async fn query_permission(&self) -> Result<PermissionStatus> {
        Ok(self.state.read().await.permission)
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        let mut state = self.state.write().await;
        if state.permission == PermissionStatus::Undetermined {
            state.permission = PermissionStatus::Granted;
        }
        Ok(state.permission)
    }

    async fn schedule(&self, notification: &ScheduledNotification) -> Result<()> {
        self.state
            .write()
            .await
            .scheduled
            .insert(notification.notification_id.clone(), notification.clone());
        Ok(())
    }

    async fn cancel(&self, notification_id: &str) -> Result<()> {
        self.state.write().await.scheduled.remove(notification_id);
        Ok(())
    }

    async fn cancel_all(&self) -> Result<()> {
        self.state.write().await.scheduled.clear();
        Ok(())
    }
}
