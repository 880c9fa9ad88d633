// file: src/database/settings.rs
use anyhow::Result;
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> Result<crate::models::Settings> {
    let rows = sqlx::query_as::<_, crate::models::Setting>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;

    // Missing keys fall back to defaults
    let mut settings = crate::models::Settings::default();
    for row in rows {
        match row.key.as_str() {
            "sound" => settings.sound = row.value,
            "volume" => settings.volume = row.value.parse().unwrap_or(0.7),
            "pre_athan_minutes" => settings.pre_athan_minutes = row.value.parse().unwrap_or(15),
            "iqama_minutes" => settings.iqama_minutes = row.value.parse().unwrap_or(10),
            "snooze_minutes" => settings.snooze_minutes = row.value.parse().unwrap_or(10),
            "max_snoozes" => settings.max_snoozes = row.value.parse().unwrap_or(3),
            "refresh_interval" => settings.refresh_interval = row.value.parse().unwrap_or(300),
            "fajr_alarm" => settings.fajr_alarm = row.value.parse().unwrap_or(true),
            "jummah_alarm" => settings.jummah_alarm = row.value.parse().unwrap_or(true),
            "athan_alert" => settings.athan_alert = row.value.parse().unwrap_or(true),
            "pre_athan_alert" => settings.pre_athan_alert = row.value.parse().unwrap_or(false),
            "iqama_alert" => settings.iqama_alert = row.value.parse().unwrap_or(false),
            _ => {}
        }
    }

    Ok(settings)
}

pub async fn update(pool: &SqlitePool, settings: &crate::models::Settings) -> Result<()> {
    let updates = vec![
        ("sound", settings.sound.clone()),
        ("volume", settings.volume.to_string()),
        ("pre_athan_minutes", settings.pre_athan_minutes.to_string()),
        ("iqama_minutes", settings.iqama_minutes.to_string()),
        ("snooze_minutes", settings.snooze_minutes.to_string()),
        ("max_snoozes", settings.max_snoozes.to_string()),
        ("refresh_interval", settings.refresh_interval.to_string()),
        ("fajr_alarm", settings.fajr_alarm.to_string()),
        ("jummah_alarm", settings.jummah_alarm.to_string()),
        ("athan_alert", settings.athan_alert.to_string()),
        ("pre_athan_alert", settings.pre_athan_alert.to_string()),
        ("iqama_alert", settings.iqama_alert.to_string()),
    ];

    for (key, value) in updates {
        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// Read a single raw settings value; used for sub-states that persist outside
/// the `Settings` struct, like the notification permission.
pub async fn get_raw(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value.map(|(v,)| v))
}

pub async fn set_raw(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;

    Ok(())
}
