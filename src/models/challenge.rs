// file: src/models/challenge.rs
// Device-reported alarm state. These records are read-only snapshots owned by
// the native alarm subsystem, never by the store.
use super::alarm::AlarmType;
use serde::{Deserialize, Serialize};

/// Epoch values below this are assumed to be seconds.
pub const EPOCH_MS_THRESHOLD: i64 = 1_000_000_000_000;

/// Normalize a platform-reported epoch value to milliseconds. One platform
/// reports seconds, the other milliseconds; values below 1e12 are seconds.
pub fn normalize_epoch_ms(value: i64) -> i64 {
    if value < EPOCH_MS_THRESHOLD {
        value * 1000
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampUnit {
    Seconds,
    Milliseconds,
}

/// A native-reported alarm currently awaiting user acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingChallenge {
    pub alarm_id: String,
    pub alarm_type: AlarmType,
    pub title: String,
    /// Epoch timestamp in the unit the platform reports.
    pub timestamp: i64,
    /// Bridges that know their platform tag the unit; untagged values go
    /// through the magnitude heuristic.
    pub unit: Option<TimestampUnit>,
}

impl PendingChallenge {
    pub fn timestamp_ms(&self) -> i64 {
        match self.unit {
            Some(TimestampUnit::Seconds) => self.timestamp * 1000,
            Some(TimestampUnit::Milliseconds) => self.timestamp,
            None => normalize_epoch_ms(self.timestamp),
        }
    }

    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp_ms()
    }
}

/// Device-reported record of an alarm already resolved; pure exclusion set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedQueueEntry {
    pub alarm_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveAlarmSource {
    PendingChallenge,
    PastDue,
}

/// The single alarm surfaced to the UI after a reconciliation pass. Derived
/// and ephemeral; recomputed fresh each pass, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveAlarmInfo {
    pub alarm_id: String,
    pub alarm_type: AlarmType,
    pub title: String,
    pub source: ActiveAlarmSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_seconds_scaled() {
        assert_eq!(normalize_epoch_ms(1_700_000_000), 1_700_000_000_000);
        assert_eq!(normalize_epoch_ms(0), 0);
        assert_eq!(normalize_epoch_ms(999_999_999_999), 999_999_999_999_000);
    }

    #[test]
    fn test_normalize_millis_unchanged() {
        assert_eq!(normalize_epoch_ms(1_700_000_000_000), 1_700_000_000_000);
        assert_eq!(normalize_epoch_ms(EPOCH_MS_THRESHOLD), EPOCH_MS_THRESHOLD);
    }

    #[test]
    fn test_tagged_unit_beats_heuristic() {
        let challenge = PendingChallenge {
            alarm_id: "a".to_string(),
            alarm_type: AlarmType::Fajr,
            title: "Fajr prayer".to_string(),
            // Large enough that the heuristic would call it milliseconds.
            timestamp: 1_700_000_000_000,
            unit: Some(TimestampUnit::Seconds),
        };
        assert_eq!(challenge.timestamp_ms(), 1_700_000_000_000_000);
    }

    #[test]
    fn test_untagged_falls_back_to_heuristic() {
        let challenge = PendingChallenge {
            alarm_id: "a".to_string(),
            alarm_type: AlarmType::Custom,
            title: "Custom".to_string(),
            timestamp: 1_700_000_000,
            unit: None,
        };
        assert_eq!(challenge.timestamp_ms(), 1_700_000_000_000);
    }

    #[test]
    fn test_age_ms() {
        let challenge = PendingChallenge {
            alarm_id: "a".to_string(),
            alarm_type: AlarmType::Custom,
            title: "Custom".to_string(),
            timestamp: 1_000,
            unit: Some(TimestampUnit::Milliseconds),
        };
        assert_eq!(challenge.age_ms(5_000), 4_000);
    }
}
