#![allow(dead_code)]
// Prayer time provider boundary.
// The remote adapter lives in `aladhan`; everything downstream consumes the
// trait so tests can substitute canned timings.

use crate::models::DayTimings;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::warn;

pub mod aladhan;
pub mod common;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrayerTimeProvider: Send + Sync {
    /// Resolved timings for one local calendar day.
    async fn timings_for(&self, date: NaiveDate) -> Result<DayTimings>;
}

/// Today's and tomorrow's timings plus fetch bookkeeping. The monitor holds
/// one of these and refreshes it when stale or when the local date rolls over.
#[derive(Debug, Clone)]
pub struct TimingsWindow {
    pub today: DayTimings,
    pub tomorrow: Option<DayTimings>,
    pub fetched_at: DateTime<Utc>,
}

impl TimingsWindow {
    pub fn is_stale(&self, refresh_interval_secs: i64, local_today: NaiveDate) -> bool {
        if self.today.date != local_today {
            return true;
        }
        (Utc::now() - self.fetched_at).num_seconds() >= refresh_interval_secs
    }
}

/// Fetch today's and tomorrow's timings. Today's fetch must succeed; a failed
/// tomorrow fetch degrades to a one-day window so scheduling can still cover
/// the rest of today.
pub async fn refresh_window<P: PrayerTimeProvider + ?Sized>(
    provider: &P,
    local_today: NaiveDate,
) -> Result<TimingsWindow> {
    let today = provider.timings_for(local_today).await?;

    let tomorrow = match local_today.succ_opt() {
        Some(next_date) => match provider.timings_for(next_date).await {
            Ok(timings) => Some(timings),
            Err(e) => {
                warn!("Failed to fetch tomorrow's timings: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(TimingsWindow {
        today,
        tomorrow,
        fetched_at: Utc::now(),
    })
}
