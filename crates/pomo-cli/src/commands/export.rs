//! Export command for writing a profile's state as JSON.

use std::io::Write;

use anyhow::Result;
use pomo_core::Engine;
use pomo_db::Database;

use super::util::load_snapshot;
use crate::Config;

/// Writes the normalized snapshot of the configured profile.
pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config, engine: &Engine) -> Result<()> {
    let snapshot = engine.load(load_snapshot(db, config)?).to_snapshot();
    serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;
    use pomo_core::StateSnapshot;

    #[test]
    fn exports_snapshot_with_derived_level() {
        let mut db = Database::open_in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        let engine = Engine::default();
        let (_, snapshot) = engine.record_completion(StateSnapshot::default(), 1500, &now);
        let stale = StateSnapshot {
            level: 7,
            ..snapshot
        };
        db.save_snapshot("default", &stale, now).unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &Config::default(), &engine).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r#"
        {
          "xp": 50,
          "level": 1,
          "total_sessions": 1,
          "total_focus_time": 1500,
          "unlocked_achievements": [
            "first_pomodoro"
          ],
          "current_streak": 1,
          "last_completion_date": "2025-01-15",
          "daily_stats": {
            "2025-01-15": 1
          },
          "weekly_stats": {
            "2025-W02": 1
          },
          "monthly_stats": {
            "2025-01": 1
          }
        }
        "#);
    }

    #[test]
    fn exports_empty_state_for_new_profile() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, &Config::default(), &Engine::default()).unwrap();

        let snapshot: StateSnapshot = serde_json::from_slice(&output).unwrap();
        assert_eq!(snapshot.xp, 0);
        assert_eq!(snapshot.level, 1);
        assert!(snapshot.daily_stats.is_empty());
    }
}
