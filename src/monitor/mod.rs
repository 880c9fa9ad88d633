// Lifecycle monitor loop.
// Each wake cycle: reconcile device alarm state first; if nothing demands the
// user's attention, refresh stale timings and re-register upcoming alarm and
// notification triggers.

use crate::detector::ActiveAlarmDetector;
use crate::models::{ActiveAlarmInfo, AlarmType, Prayer};
use crate::notify::NotificationScheduler;
use crate::provider::{self, PrayerTimeProvider, TimingsWindow};
use crate::scheduler::AlarmScheduler;
use crate::utils;
use crate::AppState;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::time::{sleep, Duration};

const CYCLE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub enum MonitorEvent {
    ChallengeDetected(ActiveAlarmInfo),
    TimingsRefreshed { date: NaiveDate },
    AlarmScheduled { alarm_id: String, alarm_type: AlarmType },
    NotificationsScheduled(usize),
    Error(String),
}

pub struct Monitor<P: PrayerTimeProvider> {
    state: Arc<AppState>,
    provider: P,
    timezone: Tz,
    detector: ActiveAlarmDetector,
    scheduler: AlarmScheduler,
    notifications: NotificationScheduler,
    window: Option<TimingsWindow>,
    /// Alarms already surfaced this session; the UI is not re-prompted.
    handled: HashSet<String>,
    sender: Option<Sender<MonitorEvent>>,
}

pub async fn run_monitor<P: PrayerTimeProvider>(
    state: Arc<AppState>,
    provider: P,
    timezone: Tz,
    sender: Option<Sender<MonitorEvent>>,
) {
    Monitor::new(state, provider, timezone, sender).run().await
}

impl<P: PrayerTimeProvider> Monitor<P> {
    pub fn new(
        state: Arc<AppState>,
        provider: P,
        timezone: Tz,
        sender: Option<Sender<MonitorEvent>>,
    ) -> Self {
        let detector = ActiveAlarmDetector::new(state.db.clone(), state.alarms.clone());
        let scheduler = AlarmScheduler::new(state.db.clone(), state.alarms.clone());
        let notifications = NotificationScheduler::new(state.db.clone(), state.notifier.clone());

        Self {
            state,
            provider,
            timezone,
            detector,
            scheduler,
            notifications,
            window: None,
            handled: HashSet::new(),
            sender,
        }
    }

    pub async fn run(mut self) {
        info!("Starting alarm monitor loop");

        loop {
            if self.state.shutdown.is_cancelled() {
                info!("Shutdown signal received, stopping monitor loop");
                break;
            }

            match self.cycle().await {
                Ok(_) => {
                    debug!("Monitor cycle completed successfully");
                }
                Err(e) => {
                    error!("Error in monitor cycle: {}", e);
                    self.emit(MonitorEvent::Error(e.to_string())).await;
                }
            }

            // Sleep between cycles, but wake on shutdown
            tokio::select! {
                _ = sleep(CYCLE_INTERVAL) => {}
                _ = self.state.shutdown.cancelled() => {
                    info!("Shutdown signal received during sleep, stopping monitor loop");
                    break;
                }
            }
        }

        info!("Alarm monitor loop stopped gracefully");
    }

    async fn cycle(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Reconciliation comes first; an active challenge owns the cycle and
        // scheduling resumes on the next one.
        let scheduled = self.state.db.get_scheduled_alarms().await?;
        if let Some(active) = self
            .detector
            .detect_active_alarm(&scheduled, &self.handled)
            .await
        {
            info!(
                "Active alarm detected: {} (source {:?})",
                active.alarm_id, active.source
            );
            self.handled.insert(active.alarm_id.clone());
            self.emit(MonitorEvent::ChallengeDetected(active)).await;
            return Ok(());
        }

        let settings = self.state.db.get_settings().await?;

        // Refresh timings when stale or on date rollover
        let local_today = utils::local_today(self.timezone);
        let needs_refresh = self
            .window
            .as_ref()
            .map(|w| w.is_stale(settings.refresh_interval as i64, local_today))
            .unwrap_or(true);

        if needs_refresh {
            match provider::refresh_window(&self.provider, local_today).await {
                Ok(fresh) => {
                    self.emit(MonitorEvent::TimingsRefreshed { date: fresh.today.date })
                        .await;
                    self.window = Some(fresh);
                }
                Err(e) => {
                    if self.window.is_none() {
                        return Err(e.into());
                    }
                    // A stale window still covers scheduling for today
                    warn!("Timings refresh failed, keeping previous window: {}", e);
                }
            }
        }

        let Some(window) = self.window.as_ref() else {
            return Ok(());
        };
        let today = window.today.clone();
        let tomorrow = window.tomorrow.clone();
        let jummah_in_window = utils::is_jummah_day(today.date)
            || tomorrow
                .as_ref()
                .map(|t| utils::is_jummah_day(t.date))
                .unwrap_or(false);

        // Re-register upcoming ritual alarms
        let now = Utc::now();
        if settings.fajr_alarm && !self.scheduler.has_upcoming(AlarmType::Fajr, now).await? {
            if let Some(alarm_id) = self
                .scheduler
                .schedule_prayer_alarm(Prayer::Fajr, AlarmType::Fajr, &today, tomorrow.as_ref())
                .await
            {
                self.emit(MonitorEvent::AlarmScheduled {
                    alarm_id,
                    alarm_type: AlarmType::Fajr,
                })
                .await;
            }
        }

        if settings.jummah_alarm
            && jummah_in_window
            && !self.scheduler.has_upcoming(AlarmType::Jummah, now).await?
        {
            if let Some(alarm_id) = self
                .scheduler
                .schedule_prayer_alarm(Prayer::Dhuhr, AlarmType::Jummah, &today, tomorrow.as_ref())
                .await
            {
                self.emit(MonitorEvent::AlarmScheduled {
                    alarm_id,
                    alarm_type: AlarmType::Jummah,
                })
                .await;
            }
        }

        // Re-register prayer notifications
        let count = self.notifications.reconcile(&today, &settings).await?;
        self.emit(MonitorEvent::NotificationsScheduled(count)).await;

        Ok(())
    }

    async fn emit(&self, event: MonitorEvent) {
        if let Some(tx) = &self.sender {
            let _ = tx.send(event).await;
        }
    }
}
