//! Complete command for recording a finished focus session.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use clap::Args;
use pomo_core::{CompletionResult, Engine};
use pomo_db::Database;

use super::util::{days, load_snapshot};
use crate::Config;

#[derive(Debug, Args)]
pub struct CompleteArgs {
    /// Length of the focus session in seconds.
    #[arg(long, default_value_t = 1500, allow_negative_numbers = true)]
    pub focus_seconds: i64,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &CompleteArgs,
    db: &mut Database,
    config: &Config,
    engine: &Engine,
    now: &DateTime<Tz>,
) -> Result<()> {
    let snapshot = load_snapshot(db, config)?;
    let (result, updated) = engine.record_completion(snapshot, args.focus_seconds, now);
    db.save_completion(
        &config.profile,
        &updated,
        now.with_timezone(&Utc),
        args.focus_seconds,
        &result,
    )
    .context("failed to save completion")?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write!(writer, "{}", format_result(&result))?;
    }
    Ok(())
}

/// Formats a completion result for the terminal.
pub fn format_result(result: &CompletionResult) -> String {
    let mut output = String::new();

    writeln!(output, "Pomodoro complete: +{} XP", result.xp_gained).unwrap();
    writeln!(output, "Total XP: {}", result.new_total_xp).unwrap();
    if result.leveled_up {
        writeln!(output, "Level:    {} (level up!)", result.new_level).unwrap();
    } else {
        writeln!(output, "Level:    {}", result.new_level).unwrap();
    }
    writeln!(output, "Streak:   {}", days(result.updated_streak_days)).unwrap();
    for achievement in &result.newly_unlocked_achievements {
        writeln!(
            output,
            "Unlocked: {} - {}",
            achievement.name, achievement.description
        )
        .unwrap();
    }

    output
}
