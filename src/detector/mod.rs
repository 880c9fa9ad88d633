// Active alarm detection.
// One reconciliation pass decides whether a ritual challenge should be
// surfaced: device-reported pending challenges win over past-due store
// entries, completed/handled ids are excluded everywhere, and anything older
// than the staleness threshold is auto-completed instead of surfaced.

use crate::bridge::AlarmBridge;
use crate::database::Database;
use crate::models::{
    ActiveAlarmInfo, ActiveAlarmSource, AlarmType, PendingChallenge, ScheduledAlarm,
};
use crate::utils::logging;
use anyhow::Result;
use chrono::Utc;
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Unacknowledged alarms older than this are resolved without user
/// interaction.
pub const STALE_ALARM_THRESHOLD_MS: i64 = 2 * 60 * 60 * 1000;

/// Additional attempts after the first failed pending-challenge fetch.
const PENDING_FETCH_RETRIES: u32 = 2;
const PENDING_FETCH_BACKOFF: Duration = Duration::from_millis(400);

pub struct ActiveAlarmDetector {
    db: Arc<Database>,
    bridge: Arc<dyn AlarmBridge>,
    /// Serializes reconciliation passes; rapid foreground events must not
    /// race on auto-completion writes.
    pass_guard: Mutex<()>,
}

impl ActiveAlarmDetector {
    pub fn new(db: Arc<Database>, bridge: Arc<dyn AlarmBridge>) -> Self {
        Self {
            db,
            bridge,
            pass_guard: Mutex::new(()),
        }
    }

    /// Run one reconciliation pass over a read-only snapshot of the scheduled
    /// set. `handled_ids` are alarms the caller already surfaced this
    /// session. Returns at most one alarm; `None` means the UI shows nothing.
    pub async fn detect_active_alarm(
        &self,
        scheduled: &[ScheduledAlarm],
        handled_ids: &HashSet<String>,
    ) -> Option<ActiveAlarmInfo> {
        let _pass = self.pass_guard.lock().await;
        let now_ms = Utc::now().timestamp_millis();

        // Completed queue first: a completed entry must be able to suppress a
        // still-reported challenge or past-due record.
        let completed: HashSet<String> = match self.bridge.get_completed_queue().await {
            Ok(queue) => queue.into_iter().map(|entry| entry.alarm_id).collect(),
            Err(e) => {
                warn!("Completed queue unavailable, treating as empty: {}", e);
                HashSet::new()
            }
        };

        let pending = match self.fetch_pending_challenge().await {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Giving up on pending challenge fetch: {}", e);
                return None;
            }
        };

        if let Some(challenge) = pending {
            if !completed.contains(&challenge.alarm_id)
                && !handled_ids.contains(&challenge.alarm_id)
            {
                if challenge.age_ms(now_ms) > STALE_ALARM_THRESHOLD_MS {
                    self.auto_complete(&challenge.alarm_id).await;
                } else {
                    return Some(challenge_info(&challenge));
                }
            }
        }

        // Past-due scan, earliest trigger first.
        let mut candidates: Vec<&ScheduledAlarm> = scheduled
            .iter()
            .filter(|alarm| !alarm.is_completed)
            .filter(|alarm| {
                !completed.contains(&alarm.alarm_id) && !handled_ids.contains(&alarm.alarm_id)
            })
            .collect();
        candidates.sort_by_key(|alarm| alarm.trigger_time);

        for alarm in candidates {
            let elapsed_ms = now_ms - alarm.trigger_time.timestamp_millis();
            if elapsed_ms <= 0 {
                break;
            }
            if elapsed_ms > STALE_ALARM_THRESHOLD_MS {
                self.auto_complete(&alarm.alarm_id).await;
                continue;
            }
            return Some(ActiveAlarmInfo {
                alarm_id: alarm.alarm_id.clone(),
                alarm_type: alarm.alarm_type().unwrap_or(AlarmType::Custom),
                title: alarm.title.clone(),
                source: ActiveAlarmSource::PastDue,
            });
        }

        None
    }

    async fn fetch_pending_challenge(&self) -> Result<Option<PendingChallenge>> {
        let mut attempt = 0;
        loop {
            match self.bridge.get_pending_challenge().await {
                Ok(pending) => return Ok(pending),
                Err(e) if attempt >= PENDING_FETCH_RETRIES => return Err(e),
                Err(e) => {
                    attempt += 1;
                    debug!(
                        "Pending challenge fetch failed (attempt {}), retrying: {}",
                        attempt, e
                    );
                    sleep(PENDING_FETCH_BACKOFF).await;
                }
            }
        }
    }

    /// Completion goes through the store's API (single writer per alarm
    /// record) and is mirrored to the bridge. Failures are logged; the pass
    /// continues either way.
    async fn auto_complete(&self, alarm_id: &str) {
        if let Err(e) = self.db.complete_alarm(alarm_id).await {
            logging::log_error_with_context(&e, "auto_complete");
        }
        if let Err(e) = self.bridge.complete_alarm(alarm_id).await {
            warn!(
                "Failed to report completion to bridge for {}: {}",
                alarm_id, e
            );
        }
        logging::log_alarm_event("auto-completed stale", alarm_id);
    }
}

fn challenge_info(challenge: &PendingChallenge) -> ActiveAlarmInfo {
    ActiveAlarmInfo {
        alarm_id: challenge.alarm_id.clone(),
        alarm_type: challenge.alarm_type,
        title: challenge.title.clone(),
        source: ActiveAlarmSource::PendingChallenge,
    }
}
