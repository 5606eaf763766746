//! Chart command for completions per week or month.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone};
use clap::Args;
use pomo_core::{ChartKind, ChartPoint, Engine};
use pomo_db::Database;

use super::util::load_snapshot;
use crate::Config;

const BAR_WIDTH: u64 = 20;

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Period granularity: weekly or monthly.
    pub kind: ChartKind,

    /// Number of periods to show, ending with the current one (at most 520).
    #[arg(long)]
    pub count: Option<usize>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    args: &ChartArgs,
    db: &Database,
    config: &Config,
    engine: &Engine,
    now: &DateTime<Tz>,
) -> Result<()> {
    let snapshot = load_snapshot(db, config)?;
    let count = args.count.unwrap_or_else(|| args.kind.default_count());
    let points = engine.get_chart_series(snapshot, args.kind, count, now);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&points)?)?;
    } else {
        write!(writer, "{}", format_chart(args.kind, &points))?;
    }
    Ok(())
}

/// Renders a horizontal bar chart scaled to the largest value.
pub fn format_chart(kind: ChartKind, points: &[ChartPoint]) -> String {
    let mut output = String::new();
    let heading = match kind {
        ChartKind::Weekly => "SESSIONS PER WEEK",
        ChartKind::Monthly => "SESSIONS PER MONTH",
    };
    writeln!(output, "{heading}").unwrap();
    writeln!(output, "{}", "─".repeat(heading.chars().count())).unwrap();

    let max = points.iter().map(|p| p.value).max().unwrap_or(0);
    for point in points {
        let line = format!("{:<10} {:>4}  {}", point.label, point.value, bar(point.value, max));
        writeln!(output, "{}", line.trim_end()).unwrap();
    }

    output
}

#[allow(clippy::cast_possible_truncation)]
fn bar(value: u64, max: u64) -> String {
    if value == 0 || max == 0 {
        return String::new();
    }
    let cells = (value.saturating_mul(BAR_WIDTH) / max).max(1);
    "█".repeat(cells as usize)
}
