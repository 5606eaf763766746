//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::chart::ChartArgs;
use crate::commands::complete::CompleteArgs;
use crate::commands::history::HistoryArgs;

/// Pomodoro progress tracker.
///
/// Turns completed focus sessions into XP, levels, streaks and achievements,
/// and charts completions over recent weeks and months.
#[derive(Debug, Parser)]
#[command(name = "pomo", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to read and update (overrides config).
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a completed focus session.
    Complete(CompleteArgs),

    /// Show XP, level, streak, session counts and achievements.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show progress toward the next level.
    Progress {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Chart completions per week or month.
    Chart(ChartArgs),

    /// List recently recorded sessions.
    History(HistoryArgs),

    /// Write the profile's state as JSON to stdout.
    Export,

    /// Replace the profile's state with JSON read from stdin.
    Import,

    /// Show database location and known profiles.
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    use pomo_core::ChartKind;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pomo", "stats", "--json", "-p", "work"]).unwrap();
        assert_eq!(cli.profile.as_deref(), Some("work"));
        assert!(matches!(cli.command, Some(Commands::Stats { json: true })));
    }

    #[test]
    fn complete_defaults_to_standard_session() {
        let cli = Cli::try_parse_from(["pomo", "complete"]).unwrap();
        let Some(Commands::Complete(args)) = cli.command else {
            panic!("expected complete command");
        };
        assert_eq!(args.focus_seconds, 1500);
        assert!(!args.json);
    }

    #[test]
    fn complete_accepts_negative_focus_seconds() {
        let cli = Cli::try_parse_from(["pomo", "complete", "--focus-seconds", "-60"]).unwrap();
        let Some(Commands::Complete(args)) = cli.command else {
            panic!("expected complete command");
        };
        assert_eq!(args.focus_seconds, -60);
    }

    #[test]
    fn chart_parses_kind() {
        let cli = Cli::try_parse_from(["pomo", "chart", "monthly", "--count", "3"]).unwrap();
        let Some(Commands::Chart(args)) = cli.command else {
            panic!("expected chart command");
        };
        assert_eq!(args.kind, ChartKind::Monthly);
        assert_eq!(args.count, Some(3));
    }

    #[test]
    fn chart_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["pomo", "chart", "daily"]).is_err());
    }
}
