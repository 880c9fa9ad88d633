// Minaret - prayer times alarm and reminder daemon
// Runs the monitor loop against the in-process bridge; platform builds swap
// in their native AlarmBridge/NotificationBridge implementations.

use anyhow::Context;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

use minaret::bridge::local::{LocalBridge, LocalNotifier};
use minaret::provider::aladhan::AlAdhanProvider;
use minaret::{run_monitor, AppConfig, AppState, Database, MonitorEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = minaret::utils::logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting Minaret");

    let config = AppConfig::from_env().context("Configuration invalid")?;
    let provider = AlAdhanProvider::new(
        config.endpoint.clone(),
        config.latitude,
        config.longitude,
        config.method,
        config.timezone,
    )
    .context("Failed to construct timings provider")?;

    let db = Arc::new(Database::new().await.context("Database setup failed")?);
    let shutdown = tokio_util::sync::CancellationToken::new();
    let state = Arc::new(AppState {
        db,
        alarms: Arc::new(LocalBridge::new()),
        notifier: Arc::new(LocalNotifier::new()),
        shutdown: shutdown.clone(),
    });

    let (tx, mut rx) = mpsc::channel::<MonitorEvent>(32);
    let monitor_handle = tokio::spawn(run_monitor(
        state.clone(),
        provider,
        config.timezone,
        Some(tx),
    ));

    let events_handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                MonitorEvent::ChallengeDetected(active) => {
                    info!(
                        "Ritual challenge active: {} ({:?}, via {:?})",
                        active.title, active.alarm_type, active.source
                    );
                }
                MonitorEvent::TimingsRefreshed { date } => {
                    info!("Prayer timings refreshed for {}", date);
                }
                MonitorEvent::AlarmScheduled {
                    alarm_id,
                    alarm_type,
                } => {
                    info!("Scheduled {:?} alarm {}", alarm_type, alarm_id);
                }
                MonitorEvent::NotificationsScheduled(count) => {
                    debug!("Registered {} prayer notifications", count);
                }
                MonitorEvent::Error(message) => {
                    warn!("Monitor reported: {}", message);
                }
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    shutdown.cancel();

    if let Err(e) = monitor_handle.await {
        error!("Monitor task ended abnormally: {}", e);
    }
    let _ = events_handle.await;

    info!("Minaret stopped");
    Ok(())
}
