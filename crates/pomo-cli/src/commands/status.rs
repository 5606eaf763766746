//! Status command for showing the database location and stored profiles.

use std::io::Write;

use anyhow::Result;
use pomo_db::Database;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, db: &Database, config: &Config) -> Result<()> {
    let profiles = db.list_profiles()?;

    writeln!(writer, "Pomodoro tracker status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer, "Profile:  {}", config.profile)?;

    if profiles.is_empty() {
        writeln!(writer, "No profiles stored.")?;
        return Ok(());
    }

    writeln!(writer, "Profiles:")?;
    for profile in profiles {
        let marker = if profile.name == config.profile { "*" } else { "-" };
        writeln!(
            writer,
            "{marker} {}: updated {}",
            profile.name,
            profile.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    }

    Ok(())
}
