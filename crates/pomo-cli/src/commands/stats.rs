//! Stats command for showing overall progress and achievements.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone};
use pomo_core::{Engine, StatsView, XpProgress};
use pomo_db::Database;
use serde::Serialize;

use super::util::{days, format_duration, load_snapshot, progress_bar};
use crate::Config;

/// JSON shape of `pomo stats --json`.
#[derive(Debug, Serialize)]
pub struct JsonStats {
    pub stats: StatsView,
    pub xp_progress: XpProgress,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    engine: &Engine,
    now: &DateTime<Tz>,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(db, config)?;
    let report = JsonStats {
        stats: engine.get_stats(snapshot.clone(), now),
        xp_progress: engine.get_xp_progress(snapshot),
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_stats(&report.stats, &report.xp_progress))?;
    }
    Ok(())
}

/// Formats a one-line level summary with a progress bar.
pub fn format_level_line(progress: &XpProgress) -> String {
    if progress.is_max_level {
        return format!(
            "Level {}  {}  max level",
            progress.current_level,
            progress_bar(1, 1)
        );
    }
    format!(
        "Level {}  {}  {}/{} XP to level {}",
        progress.current_level,
        progress_bar(progress.xp_into_level, progress.xp_needed_for_level),
        progress.xp_into_level,
        progress.xp_needed_for_level,
        progress.next_level
    )
}

/// Formats the human-readable stats output.
pub fn format_stats(view: &StatsView, progress: &XpProgress) -> String {
    let stats = &view.stats;
    let mut output = String::new();

    writeln!(output, "STATS").unwrap();
    writeln!(output, "─────").unwrap();
    writeln!(output, "{}", format_level_line(progress)).unwrap();
    writeln!(output, "Total XP:    {}", stats.xp).unwrap();
    writeln!(
        output,
        "Sessions:    {} (today {}, this week {}, this month {})",
        stats.total_sessions,
        stats.today_sessions,
        stats.this_week_sessions,
        stats.this_month_sessions
    )
    .unwrap();
    writeln!(output, "Focus time:  {}", format_duration(stats.total_focus_time)).unwrap();
    writeln!(output, "Streak:      {}", days(stats.current_streak)).unwrap();

    let unlocked = view.achievements.len();
    let total = unlocked + view.available_achievements.len();
    writeln!(output).unwrap();
    writeln!(output, "ACHIEVEMENTS ({unlocked}/{total})").unwrap();
    writeln!(output, "────────────").unwrap();
    for achievement in view.achievements.iter().chain(&view.available_achievements) {
        let mark = if achievement.unlocked { "x" } else { " " };
        writeln!(
            output,
            "[{mark}] {} - {}",
            achievement.name, achievement.description
        )
        .unwrap();
    }

    output
}
