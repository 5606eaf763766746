//! Import command for replacing a profile's state from JSON.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pomo_core::{Engine, StateSnapshot};
use pomo_db::Database;

use crate::Config;

pub fn run<R: Read, W: Write>(
    mut reader: R,
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    engine: &Engine,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .context("failed to read snapshot from stdin")?;
    let snapshot: StateSnapshot =
        serde_json::from_str(&input).context("invalid snapshot JSON")?;

    let state = engine.load(snapshot);
    db.save_snapshot(&config.profile, &state.to_snapshot(), now)
        .context("failed to save imported snapshot")?;
    tracing::info!(profile = %config.profile, xp = state.xp(), "snapshot imported");

    writeln!(
        writer,
        "Imported profile {}: {} XP, level {}, {} sessions",
        config.profile,
        state.xp(),
        state.level(),
        state.total_sessions()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn imports_legacy_snapshot_and_derives_level() {
        let mut db = Database::open_in_memory().unwrap();
        let input = r#"{
            "xp": 300,
            "level": 1,
            "total_sessions": 6,
            "weekly_stats": {"2025-W02": 6}
        }"#;

        let mut output = Vec::new();
        run(
            input.as_bytes(),
            &mut output,
            &mut db,
            &Config::default(),
            &Engine::default(),
            now(),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Imported profile default: 300 XP, level 3, 6 sessions\n"
        );
        let stored = db.load_snapshot("default").unwrap().unwrap();
        assert_eq!(stored.level, 3);
        assert_eq!(stored.weekly_stats.len(), 1);
    }

    #[test]
    fn rejects_malformed_period_keys() {
        let mut db = Database::open_in_memory().unwrap();
        let input = r#"{"weekly_stats": {"2025-02": 1}}"#;

        let result = run(
            input.as_bytes(),
            &mut Vec::new(),
            &mut db,
            &Config::default(),
            &Engine::default(),
            now(),
        );

        assert!(result.is_err());
        assert_eq!(db.load_snapshot("default").unwrap(), None);
    }
}
