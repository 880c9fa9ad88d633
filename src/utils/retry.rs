use anyhow::Result;
use log::{debug, info, warn};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    fn next_delay(&self, current: Duration) -> Duration {
        let scaled = (current.as_millis() as f64 * self.backoff_multiplier) as u64;
        std::cmp::min(Duration::from_millis(scaled), self.max_delay)
    }
}

pub async fn retry_with_backoff<T, F, Fut>(config: &RetryConfig, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>> + Send + 'static,
{
    let mut delay = config.base_delay;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt >= config.max_attempts => {
                warn!(
                    "Operation failed after {} attempts: {}",
                    config.max_attempts, e
                );
                return Err(anyhow::anyhow!(
                    "Failed after {} retry attempts: {}",
                    config.max_attempts,
                    e
                ));
            }
            Err(e) if !is_transient_error(&e) => {
                debug!(
                    "Attempt {} failed with non-transient error, not retrying: {}",
                    attempt, e
                );
                return Err(e);
            }
            Err(e) => {
                debug!(
                    "Attempt {} failed transiently, retrying in {:?}: {}",
                    attempt, delay, e
                );
                tokio::time::sleep(delay).await;
                delay = config.next_delay(delay);
            }
        }
    }
}

fn is_transient_error(error: &anyhow::Error) -> bool {
    let error_str = error.to_string().to_lowercase();

    // Network-level hiccups and throttling responses
    error_str.contains("timeout")
        || error_str.contains("connection")
        || error_str.contains("network")
        || error_str.contains("temporary")
        || error_str.contains("rate limit")
        || error_str.contains("too many requests")
        || error_str.contains("service unavailable")
        || error_str.contains("internal server error")
        || error_str.contains("bad gateway")
        || error_str.contains("gateway timeout")
        // HTTP status codes that are typically transient
        || error_str.contains("429")
        || error_str.contains("502")
        || error_str.contains("503")
        || error_str.contains("504")
}
