// Minaret Library
// Prayer-times alarm and ritual-reminder orchestration.
// Exposes core functionality for testing and reuse.

pub mod bridge;
pub mod command_handlers;
pub mod config;
pub mod database;
pub mod detector;
pub mod error;
pub mod http_config;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod provider;
pub mod scheduler;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use database::Database;
pub use detector::{ActiveAlarmDetector, STALE_ALARM_THRESHOLD_MS};
pub use error::AppError;
pub use models::*;
pub use monitor::{run_monitor, MonitorEvent};
pub use notify::NotificationScheduler;
pub use scheduler::{next_jummah_time, next_prayer_time, AlarmScheduler};

use std::sync::Arc;

/// Application state shared across the application
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub alarms: Arc<dyn bridge::AlarmBridge>,
    pub notifier: Arc<dyn bridge::NotificationBridge>,
    pub shutdown: tokio_util::sync::CancellationToken,
}
