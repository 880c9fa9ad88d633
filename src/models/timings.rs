// file: src/models/timings.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical prayer and secondary timing names as reported by the timings API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Sunset,
    Maghrib,
    Isha,
    Imsak,
    Midnight,
    FirstThird,
    LastThird,
}

impl Prayer {
    /// The five obligatory prayers, in daily order.
    pub const OBLIGATORY: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Prayer::Fajr => "fajr",
            Prayer::Sunrise => "sunrise",
            Prayer::Dhuhr => "dhuhr",
            Prayer::Asr => "asr",
            Prayer::Sunset => "sunset",
            Prayer::Maghrib => "maghrib",
            Prayer::Isha => "isha",
            Prayer::Imsak => "imsak",
            Prayer::Midnight => "midnight",
            Prayer::FirstThird => "firstthird",
            Prayer::LastThird => "lastthird",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Sunset => "Sunset",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
            Prayer::Imsak => "Imsak",
            Prayer::Midnight => "Midnight",
            Prayer::FirstThird => "First third",
            Prayer::LastThird => "Last third",
        }
    }

    /// Case-insensitive lookup; the API reports keys like "Fajr" or "Firstthird".
    pub fn from_name(name: &str) -> Option<Prayer> {
        match name.to_lowercase().as_str() {
            "fajr" => Some(Prayer::Fajr),
            "sunrise" => Some(Prayer::Sunrise),
            "dhuhr" => Some(Prayer::Dhuhr),
            "asr" => Some(Prayer::Asr),
            "sunset" => Some(Prayer::Sunset),
            "maghrib" => Some(Prayer::Maghrib),
            "isha" => Some(Prayer::Isha),
            "imsak" => Some(Prayer::Imsak),
            "midnight" => Some(Prayer::Midnight),
            "firstthird" => Some(Prayer::FirstThird),
            "lastthird" => Some(Prayer::LastThird),
            _ => None,
        }
    }

    pub fn is_obligatory(&self) -> bool {
        Self::OBLIGATORY.contains(self)
    }
}

/// One local calendar day's worth of resolved prayer timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayTimings {
    pub date: NaiveDate,
    times: HashMap<Prayer, DateTime<Utc>>,
}

impl DayTimings {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            times: HashMap::new(),
        }
    }

    pub fn insert(&mut self, prayer: Prayer, at: DateTime<Utc>) {
        self.times.insert(prayer, at);
    }

    pub fn get(&self, prayer: Prayer) -> Option<DateTime<Utc>> {
        self.times.get(&prayer).copied()
    }

    pub fn contains(&self, prayer: Prayer) -> bool {
        self.times.contains_key(&prayer)
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
