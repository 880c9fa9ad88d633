//! HTTP client configuration module
//!
//! Centralized configuration for HTTP clients: timeouts, retry policy, and
//! connection settings for the timings API.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub base_retry_delay: Duration,
    /// Maximum retry delay
    pub max_retry_delay: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(45),
            max_retries: 3,
            base_retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile for timings API calls. The payload is tiny; the service can be
    /// slow from mobile networks, so retries are generous and delays short.
    pub fn timings_api() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_retry_delay: Duration::from_millis(1000),
            max_retry_delay: Duration::from_secs(20),
            backoff_multiplier: 2.0,
        }
    }

    /// Build a reqwest client with this configuration
    pub fn build_client(&self) -> Result<Client, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ClientBuilder::new()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .user_agent("Minaret/1.0")
            .build()?)
    }

    /// Create retry config for external use
    pub fn to_retry_config(&self) -> crate::utils::retry::RetryConfig {
        crate::utils::retry::RetryConfig {
            max_attempts: self.max_retries,
            base_delay: self.base_retry_delay,
            max_delay: self.max_retry_delay,
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timings_profile_retry_config() {
        let config = HttpConfig::timings_api();
        let retry = config.to_retry_config();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_build_client() {
        assert!(HttpConfig::default().build_client().is_ok());
        assert!(HttpConfig::timings_api().build_client().is_ok());
    }
}
