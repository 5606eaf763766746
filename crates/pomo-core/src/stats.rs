//! Read-only projections of gamification state: stats, XP progress, charts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::achievement::AchievementRegistry;
use crate::level::LevelTable;
use crate::period::{MonthKey, WeekKey};
use crate::state::GamificationState;

/// Counters that achievements are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub xp: u64,
    pub level: u32,
    pub total_sessions: u64,
    pub total_focus_time: i64,
    pub current_streak: u32,
    pub today_sessions: u64,
    pub this_week_sessions: u64,
    pub this_month_sessions: u64,
}

/// An achievement with its unlock status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
}

/// Full stats view including achievement listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsView {
    #[serde(flatten)]
    pub stats: Stats,
    /// Unlocked achievements in registry order.
    pub achievements: Vec<AchievementStatus>,
    /// Achievements not yet unlocked, in registry order.
    pub available_achievements: Vec<AchievementStatus>,
}

/// Progress from the current level toward the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XpProgress {
    pub current_level: u32,
    /// Equal to `current_level` at the maximum level.
    pub next_level: u32,
    pub current_xp: u64,
    pub xp_for_next_level: u64,
    pub xp_into_level: u64,
    pub xp_needed_for_level: u64,
    pub progress_percentage: f64,
    pub is_max_level: bool,
}

/// Upper bound on the points in one chart series; larger counts are clamped.
pub const MAX_CHART_POINTS: usize = 520;

/// Period granularity of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Weekly,
    Monthly,
}

impl ChartKind {
    /// Number of points shown when the caller does not ask for a count.
    pub const fn default_count(self) -> usize {
        match self {
            Self::Weekly => 4,
            Self::Monthly => 6,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(UnknownChartKind(s.to_string())),
        }
    }
}

/// Error type for unknown chart kind strings.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown chart kind: {0}")]
pub struct UnknownChartKind(String);

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

/// Derives views from state without mutating it.
#[derive(Debug, Clone, Copy)]
pub struct StatsProjector<'a> {
    levels: &'a LevelTable,
    achievements: &'a AchievementRegistry,
}

impl<'a> StatsProjector<'a> {
    pub const fn new(levels: &'a LevelTable, achievements: &'a AchievementRegistry) -> Self {
        Self {
            levels,
            achievements,
        }
    }

    /// Counters as of `today`.
    pub fn stats_on(&self, state: &GamificationState, today: NaiveDate) -> Stats {
        let (today_sessions, this_week_sessions, this_month_sessions) =
            state.sessions_around(today);
        Stats {
            xp: state.xp(),
            level: state.level(),
            total_sessions: state.total_sessions(),
            total_focus_time: state.total_focus_seconds(),
            current_streak: state.current_streak(),
            today_sessions,
            this_week_sessions,
            this_month_sessions,
        }
    }

    /// Stats and achievement listings as of `now`.
    pub fn snapshot<Tz: TimeZone>(&self, state: &GamificationState, now: &DateTime<Tz>) -> StatsView {
        let stats = self.stats_on(state, now.date_naive());

        let (achievements, available_achievements) = self
            .achievements
            .iter()
            .map(|def| AchievementStatus {
                id: def.id.to_string(),
                name: def.name.to_string(),
                description: def.description.to_string(),
                unlocked: state.is_unlocked(def.id),
            })
            .partition(|status| status.unlocked);

        StatsView {
            stats,
            achievements,
            available_achievements,
        }
    }

    /// Progress toward the next level.
    #[expect(
        clippy::cast_precision_loss,
        reason = "XP values stay far below f64's exact integer range"
    )]
    pub fn xp_progress(&self, state: &GamificationState) -> XpProgress {
        let xp = state.xp();
        let current_level = state.level();
        let current_threshold = self.levels.threshold_of(current_level).unwrap_or(0);
        let xp_into_level = xp.saturating_sub(current_threshold);

        match self.levels.next_threshold(current_level) {
            Some(next) => {
                let xp_needed_for_level = next.min_xp.saturating_sub(current_threshold);
                let progress_percentage = if xp_needed_for_level == 0 {
                    100.0
                } else {
                    xp_into_level as f64 / xp_needed_for_level as f64 * 100.0
                };
                XpProgress {
                    current_level,
                    next_level: next.level,
                    current_xp: xp,
                    xp_for_next_level: next.min_xp,
                    xp_into_level,
                    xp_needed_for_level,
                    progress_percentage,
                    is_max_level: false,
                }
            }
            None => XpProgress {
                current_level,
                next_level: current_level,
                current_xp: xp,
                xp_for_next_level: xp,
                xp_into_level,
                xp_needed_for_level: 0,
                progress_percentage: 100.0,
                is_max_level: true,
            },
        }
    }

    /// Exactly `count` points ending at the period containing `now`, oldest first.
    ///
    /// `count` is clamped to [`MAX_CHART_POINTS`]. The series also stops early
    /// if it walks past the earliest representable date.
    pub fn chart_series<Tz: TimeZone>(
        &self,
        state: &GamificationState,
        kind: ChartKind,
        count: usize,
        now: &DateTime<Tz>,
    ) -> Vec<ChartPoint> {
        let today = now.date_naive();
        let count = count.min(MAX_CHART_POINTS);
        let mut points = Vec::with_capacity(count);

        match kind {
            ChartKind::Weekly => {
                let mut date = Some(today);
                for _ in 0..count {
                    let Some(day) = date else {
                        break;
                    };
                    let key = WeekKey::of(day);
                    points.push(ChartPoint {
                        label: key.label(),
                        value: state.weekly_counts().get(&key),
                    });
                    date = day.checked_sub_signed(Duration::weeks(1));
                }
            }
            ChartKind::Monthly => {
                let mut month = Some(MonthKey::of(today));
                for _ in 0..count {
                    let Some(key) = month else {
                        break;
                    };
                    points.push(ChartPoint {
                        label: key.label(),
                        value: state.monthly_counts().get(&key),
                    });
                    month = key.previous();
                }
            }
        }

        points.reverse();
        points
    }
}
