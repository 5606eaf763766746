//! Progress command for showing XP toward the next level.

use std::io::Write;

use anyhow::Result;
use pomo_core::Engine;
use pomo_db::Database;

use super::stats::format_level_line;
use super::util::load_snapshot;
use crate::Config;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    engine: &Engine,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(db, config)?;
    let progress = engine.get_xp_progress(snapshot);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&progress)?)?;
        return Ok(());
    }

    writeln!(writer, "{}", format_level_line(&progress))?;
    if progress.is_max_level {
        writeln!(writer, "{} XP total", progress.current_xp)?;
    } else {
        writeln!(
            writer,
            "{} XP total, {} XP needed for level {} ({:.1}%)",
            progress.current_xp,
            progress.xp_for_next_level,
            progress.next_level,
            progress.progress_percentage
        )?;
    }
    Ok(())
}
