#![allow(dead_code)]
// AlAdhan-style timings API adapter.
// Fetches one day's timings and resolves the clock labels against the
// configured location's timezone.

use crate::models::{DayTimings, Prayer};
use crate::provider::{common, PrayerTimeProvider};
use crate::utils;
use crate::utils::logging;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Instant;

const SERVICE_NAME: &str = "timings_api";

#[derive(Debug, Deserialize)]
struct TimingsResponse {
    code: i32,
    status: String,
    data: TimingsData,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: HashMap<String, String>,
}

pub struct AlAdhanProvider {
    endpoint: String,
    latitude: f64,
    longitude: f64,
    method: u32,
    timezone: Tz,
}

impl AlAdhanProvider {
    pub fn new(
        endpoint: String,
        latitude: f64,
        longitude: f64,
        method: u32,
        timezone: Tz,
    ) -> Result<Self> {
        common::validate_endpoint_url(&endpoint)?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            latitude,
            longitude,
            method,
            timezone,
        })
    }

    fn timings_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/timings/{}?latitude={}&longitude={}&method={}",
            self.endpoint,
            date.format("%d-%m-%Y"),
            self.latitude,
            self.longitude,
            self.method
        )
    }

    fn parse_response(&self, body: &str, date: NaiveDate) -> Result<DayTimings> {
        let response: TimingsResponse = serde_json::from_str(body)
            .map_err(|e| anyhow!("Failed to parse timings response: {}", e))?;

        if response.code != 200 {
            return Err(anyhow!(
                "Timings API returned code {}: {}",
                response.code,
                response.status
            ));
        }

        let mut timings = DayTimings::new(date);

        for (key, label) in &response.data.timings {
            let Some(prayer) = Prayer::from_name(key) else {
                log::debug!("Skipping unrecognized timing key: {}", key);
                continue;
            };

            let Some(clock) = utils::parse_clock_label(label) else {
                log::warn!("Unparseable clock label for {}: {:?}", key, label);
                continue;
            };

            // Night timings past midnight belong to the next calendar day
            let effective_date = match prayer {
                Prayer::Midnight | Prayer::FirstThird | Prayer::LastThird if clock.hour() < 12 => {
                    date.succ_opt().unwrap_or(date)
                }
                _ => date,
            };

            if let Some(at) = utils::local_to_utc(effective_date, clock, self.timezone) {
                timings.insert(prayer, at);
            }
        }

        if timings.is_empty() {
            return Err(anyhow!(
                "No timings parsed for {}; response had {} entries",
                date,
                response.data.timings.len()
            ));
        }

        Ok(timings)
    }
}

#[async_trait]
impl PrayerTimeProvider for AlAdhanProvider {
    async fn timings_for(&self, date: NaiveDate) -> Result<DayTimings> {
        let start_time = Instant::now();
        let url = self.timings_url(date);

        let body = common::fetch_json(&url, SERVICE_NAME).await?;
        let timings = self.parse_response(&body, date)?;

        logging::log_timings_fetch(date, timings.len(), start_time.elapsed().as_millis() as u64);
        Ok(timings)
    }
}

pub async fn test_connection(provider: &AlAdhanProvider) -> Result<bool> {
    let today = utils::local_today(provider.timezone);

    match provider.timings_for(today).await {
        Ok(_) => {
            log::info!("Timings API connection successful");
            Ok(true)
        }
        Err(e) => {
            log::warn!("Timings API connection failed: {}", e);
            Ok(false)
        }
    }
}
