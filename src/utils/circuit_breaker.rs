use anyhow::Result;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub success_threshold: u32,
    pub timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 3,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure_time: Option<Instant>,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: RwLock<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure_time: None,
            }),
        }
    }

    pub async fn execute<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>> + Send,
    {
        {
            let mut inner = self.inner.write().await;
            if inner.state == CircuitState::Open {
                let timed_out = inner
                    .last_failure_time
                    .map(|at| at.elapsed() > self.config.timeout)
                    .unwrap_or(false);
                if timed_out {
                    inner.state = CircuitState::HalfOpen;
                    inner.success_count = 0;
                    info!("Circuit breaker transitioning to half-open after timeout");
                } else {
                    return Err(anyhow::anyhow!("Circuit breaker is open"));
                }
            }
        }

        let result = operation().await;

        match &result {
            Ok(_) => self.on_success().await,
            Err(_) => self.on_failure().await,
        }

        result
    }

    async fn on_success(&self) {
        let mut inner = self.inner.write().await;
        match inner.state {
            CircuitState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    info!(
                        "Circuit breaker closing after {} successful calls",
                        inner.success_count
                    );
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                }
            }
            // A success in any other state wipes the failure streak.
            CircuitState::Closed | CircuitState::Open => {
                inner.state = CircuitState::Closed;
                inner.failure_count = 0;
            }
        }
    }

    async fn on_failure(&self) {
        let mut inner = self.inner.write().await;
        inner.failure_count += 1;
        inner.last_failure_time = Some(Instant::now());

        if inner.state != CircuitState::Open && inner.failure_count >= self.config.failure_threshold
        {
            warn!(
                "Circuit breaker opening after {} failures",
                inner.failure_count
            );
            inner.state = CircuitState::Open;
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.read().await.state
    }

    pub async fn stats(&self) -> CircuitBreakerStats {
        let inner = self.inner.read().await;
        CircuitBreakerStats {
            state: inner.state,
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            last_failure_time: inner.last_failure_time,
        }
    }
}

#[derive(Debug)]
pub struct CircuitBreakerStats {
    pub state: CircuitState,
    pub failure_count: u32,
    pub success_count: u32,
    pub last_failure_time: Option<Instant>,
}

// Registry of circuit breakers keyed by external service name
pub struct CircuitBreakerRegistry {
    breakers: RwLock<HashMap<String, Arc<CircuitBreaker>>>,
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBreakerRegistry {
    pub fn new() -> Self {
        Self {
            breakers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_breaker(&self, service_name: &str) -> Arc<CircuitBreaker> {
        let mut breakers = self.breakers.write().await;

        if !breakers.contains_key(service_name) {
            let config = match service_name {
                "timings_api" => CircuitBreakerConfig {
                    failure_threshold: 3,
                    success_threshold: 2,
                    timeout: Duration::from_secs(30),
                },
                _ => CircuitBreakerConfig::default(),
            };

            breakers.insert(
                service_name.to_string(),
                Arc::new(CircuitBreaker::new(config)),
            );
            info!("Created circuit breaker for service: {}", service_name);
        }

        breakers.get(service_name).unwrap().clone()
    }

    pub async fn get_all_stats(&self) -> HashMap<String, CircuitBreakerStats> {
        let breakers = self.breakers.read().await;
        let mut stats = HashMap::new();

        for (service_name, breaker) in breakers.iter() {
            stats.insert(service_name.clone(), breaker.stats().await);
        }

        stats
    }
}

lazy_static::lazy_static! {
    pub static ref CIRCUIT_BREAKER_REGISTRY: CircuitBreakerRegistry = CircuitBreakerRegistry::new();
}

pub async fn get_circuit_breaker(service_name: &str) -> Arc<CircuitBreaker> {
    CIRCUIT_BREAKER_REGISTRY.get_breaker(service_name).await
}
