// file: src/models/settings.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub sound: String,
    pub volume: f32,             // 0.0 to 1.0
    pub pre_athan_minutes: i32,  // reminder lead before athan
    pub iqama_minutes: i32,      // delay from athan to iqama
    pub snooze_minutes: i32,
    pub max_snoozes: i32,
    pub refresh_interval: i32,   // seconds between timings refreshes
    pub fajr_alarm: bool,        // ritual-challenge alarm at fajr
    pub jummah_alarm: bool,      // ritual-challenge alarm at Friday dhuhr
    pub athan_alert: bool,       // notification at prayer time
    pub pre_athan_alert: bool,
    pub iqama_alert: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: "athan_makkah".to_string(),
            volume: 0.7,
            pre_athan_minutes: 15,
            iqama_minutes: 10,
            snooze_minutes: 10,
            max_snoozes: 3,
            refresh_interval: 300, // 5 minutes
            fajr_alarm: true,
            jummah_alarm: true,
            athan_alert: true,
            pre_athan_alert: false,
            iqama_alert: false,
        }
    }
}
