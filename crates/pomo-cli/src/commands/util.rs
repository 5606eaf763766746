//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use pomo_core::StateSnapshot;
use pomo_db::Database;

use crate::Config;

/// Opens the configured database, creating its parent directory if needed.
pub fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Loads the configured profile's snapshot, or an empty one for a new profile.
pub fn load_snapshot(db: &Database, config: &Config) -> Result<StateSnapshot> {
    let snapshot = db
        .load_snapshot(&config.profile)
        .with_context(|| format!("failed to load profile {}", config.profile))?;
    if snapshot.is_none() {
        tracing::debug!(profile = %config.profile, "no stored state, starting fresh");
    }
    Ok(snapshot.unwrap_or_default())
}

/// Formats seconds as "Xh Ym" if at least an hour, otherwise "Xm".
/// Negative durations are shown as 0m.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0m".to_string();
    }
    let total_minutes = seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Generates a 10-character bar for `value` out of `max`.
/// Non-zero values below 5% of max still get a single block.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: u64, max: u64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// "1 day", "3 days".
pub fn days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_hours_and_minutes() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(1500), "25m");
        assert_eq!(format_duration(4500), "1h 15m");
        assert_eq!(format_duration(-60), "0m");
    }

    #[test]
    fn progress_bar_scales_to_ten_cells() {
        assert_eq!(progress_bar(0, 0), "░░░░░░░░░░");
        assert_eq!(progress_bar(0, 10), "░░░░░░░░░░");
        assert_eq!(progress_bar(1, 100), "█░░░░░░░░░");
        assert_eq!(progress_bar(50, 150), "███░░░░░░░");
        assert_eq!(progress_bar(10, 10), "██████████");
    }

    #[test]
    fn days_pluralizes() {
        assert_eq!(days(0), "0 days");
        assert_eq!(days(1), "1 day");
        assert_eq!(days(7), "7 days");
    }
}
