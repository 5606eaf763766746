//! History command for listing recently recorded sessions.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::TimeZone;
use clap::Args;
use pomo_core::Engine;
use pomo_db::{CompletionRecord, Database};

use super::util::{days, format_duration};
use crate::Config;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Maximum number of sessions to show.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &HistoryArgs,
    db: &Database,
    config: &Config,
    engine: &Engine,
    tz: &Tz,
) -> Result<()>
where
    Tz::Offset: Display,
{
    let records = db
        .recent_completions(&config.profile, args.limit)
        .context("failed to load history")?;

    if records.is_empty() {
        writeln!(writer, "No sessions recorded for profile {}.", config.profile)?;
        return Ok(());
    }

    for record in &records {
        writeln!(writer, "{}", format_record(record, engine, tz))?;
    }
    Ok(())
}

fn format_record<Tz: TimeZone>(record: &CompletionRecord, engine: &Engine, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut line = format!(
        "{}  {:>6}  +{} XP  total {}  level {}  streak {}",
        record.completed_at.with_timezone(tz).format("%Y-%m-%d %H:%M"),
        format_duration(record.focus_seconds),
        record.xp_gained,
        record.total_xp,
        record.level,
        days(record.streak_days)
    );
    if !record.achievements.is_empty() {
        let names: Vec<&str> = record
            .achievements
            .iter()
            .map(|id| engine.achievements().get(id).map_or(id.as_str(), |a| a.name))
            .collect();
        line.push_str("  [");
        line.push_str(&names.join(", "));
        line.push(']');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, FixedOffset, Utc};
    use insta::assert_snapshot;

    use crate::commands::complete::{self, CompleteArgs};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, h, 0, 0).unwrap()
    }

    fn seeded_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        let engine = Engine::default();
        let args = CompleteArgs {
            focus_seconds: 1500,
            json: false,
        };
        for now in [at(13, 9), at(14, 9), at(15, 9), at(15, 14)] {
            complete::run(&mut Vec::new(), &args, &mut db, &Config::default(), &engine, &now)
                .unwrap();
        }
        db
    }

    fn history<Tz: TimeZone>(db: &Database, limit: usize, tz: &Tz) -> String
    where
        Tz::Offset: Display,
    {
        let mut output = Vec::new();
        run(
            &mut output,
            &HistoryArgs { limit },
            db,
            &Config::default(),
            &Engine::default(),
            tz,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn lists_newest_first_with_unlock_names() {
        let db = seeded_db();
        assert_snapshot!(history(&db, 10, &Utc), @r"
        2025-01-15 14:00     25m  +50 XP  total 200  level 2  streak 3 days
        2025-01-15 09:00     25m  +50 XP  total 150  level 2  streak 3 days  [3 Day Streak]
        2025-01-14 09:00     25m  +50 XP  total 100  level 2  streak 2 days
        2025-01-13 09:00     25m  +50 XP  total 50  level 1  streak 1 day  [First Steps]
        ");
    }

    #[test]
    fn limit_and_display_timezone_apply() {
        let db = seeded_db();
        let tz = FixedOffset::west_opt(10 * 3600).unwrap();
        assert_snapshot!(history(&db, 2, &tz), @r"
        2025-01-15 04:00     25m  +50 XP  total 200  level 2  streak 3 days
        2025-01-14 23:00     25m  +50 XP  total 150  level 2  streak 3 days  [3 Day Streak]
        ");
    }

    #[test]
    fn empty_history_message() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(
            history(&db, 10, &Utc),
            "No sessions recorded for profile default.\n"
        );
    }
}
