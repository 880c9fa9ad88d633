//! Application configuration
//!
//! Location, timezone, and timings API settings come from the environment.
//! Everything else lives in the settings table.

use crate::error::{AppError, AppResult};
use crate::provider::common;
use chrono_tz::Tz;
use log::info;
use std::env;

pub const DEFAULT_ENDPOINT: &str = "https://api.aladhan.com/v1";

/// Default calculation method (Muslim World League).
pub const DEFAULT_METHOD: u32 = 3;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
    pub method: u32,
    pub endpoint: String,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let latitude = required_f64("MINARET_LATITUDE")?;
        let longitude = required_f64("MINARET_LONGITUDE")?;

        let timezone: Tz = env::var("MINARET_TIMEZONE")
            .map_err(|_| AppError::config("MINARET_TIMEZONE is not set (e.g. Africa/Cairo)"))?
            .parse()
            .map_err(|e| AppError::config(format!("Invalid MINARET_TIMEZONE: {}", e)))?;

        let method = match env::var("MINARET_METHOD") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::config(format!("Invalid MINARET_METHOD: {}", raw)))?,
            Err(_) => DEFAULT_METHOD,
        };

        let endpoint =
            env::var("MINARET_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let config = Self {
            latitude,
            longitude,
            timezone,
            method,
            endpoint,
        };
        config.validate()?;

        info!(
            "Configuration loaded (timezone {}, method {})",
            config.timezone, config.method
        );
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::config(format!(
                "Latitude out of range: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::config(format!(
                "Longitude out of range: {}",
                self.longitude
            )));
        }
        common::validate_endpoint_url(&self.endpoint)
            .map_err(|e| AppError::config(e.to_string()))?;

        Ok(())
    }
}

fn required_f64(name: &str) -> AppResult<f64> {
    let raw = env::var(name)
        .map_err(|_| AppError::config(format!("{} is not set", name)))?;
    raw.parse()
        .map_err(|_| AppError::config(format!("Invalid {}: {}", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_base_env() {
        env::set_var("MINARET_LATITUDE", "30.0444");
        env::set_var("MINARET_LONGITUDE", "31.2357");
        env::set_var("MINARET_TIMEZONE", "Africa/Cairo");
        env::remove_var("MINARET_METHOD");
        env::remove_var("MINARET_ENDPOINT");
    }

    #[test]
    #[serial]
    fn test_from_env_with_defaults() {
        set_base_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.latitude, 30.0444);
        assert_eq!(config.timezone, chrono_tz::Africa::Cairo);
        assert_eq!(config.method, DEFAULT_METHOD);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    #[serial]
    fn test_from_env_missing_latitude() {
        set_base_env();
        env::remove_var("MINARET_LATITUDE");

        let result = AppConfig::from_env();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("MINARET_LATITUDE"));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timezone() {
        set_base_env();
        env::set_var("MINARET_TIMEZONE", "Mars/Olympus_Mons");

        assert!(AppConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_validate_rejects_out_of_range_latitude() {
        set_base_env();
        env::set_var("MINARET_LATITUDE", "91.0");

        let result = AppConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Latitude"));
    }

    #[test]
    #[serial]
    fn test_validate_rejects_http_endpoint() {
        set_base_env();
        env::set_var("MINARET_ENDPOINT", "http://api.aladhan.com/v1");

        assert!(AppConfig::from_env().is_err());
    }
}
