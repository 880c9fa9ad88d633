#![allow(dead_code)]
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

pub fn init_logging() -> Result<(), SetLoggerError> {
    let env = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level = match env.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    let mut builder = Builder::from_default_env();

    // Customize format for better readability
    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();
        let file = record.file().unwrap_or("unknown");
        let line = record.line().unwrap_or(0);

        match record.level() {
            Level::Info => {
                writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args())
            }
            level => {
                writeln!(
                    buf,
                    "{} [{}] [{}:{}] {}: {}",
                    timestamp,
                    level,
                    file,
                    line,
                    target,
                    record.args()
                )
            }
        }
    });

    // Filter out noisy modules in production
    if env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production" {
        builder.filter_module("reqwest", LevelFilter::Warn);
        builder.filter_module("hyper", LevelFilter::Warn);
        builder.filter_module("tokio", LevelFilter::Info);
        builder.filter_module("sqlx", LevelFilter::Warn);
    }

    builder
        .filter_level(log_level)
        .target(Target::Stdout)
        .init();
    Ok(())
}

pub fn log_error_with_context(error: &anyhow::Error, context: &str) {
    log::error!("[{}] {}", context, error);

    // Log chain of causes for better debugging
    let mut source = error.source();
    while let Some(err) = source {
        log::error!("  Caused by: {}", err);
        source = err.source();
    }
}

pub fn log_network_error(operation: &str, error: &dyn std::error::Error) {
    log::warn!("[Network] {} failed: {}", operation, error);
}

pub fn log_timings_fetch(date: chrono::NaiveDate, timings_count: usize, duration_ms: u64) {
    log::info!(
        "[Timings] Fetched {} timings for {} in {}ms",
        timings_count,
        date,
        duration_ms
    );
}

pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64) {
    log::debug!(
        "[Database] {} on table {} took {}ms",
        operation,
        table,
        duration_ms
    );
}

pub fn log_alarm_event(event: &str, alarm_id: &str) {
    log::info!("[Alarm] {} for alarm '{}'", event, alarm_id);
}
