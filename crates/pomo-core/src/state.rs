//! Per-user gamification state and its persisted snapshot form.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::level::LevelTable;
use crate::period::{DayKey, MonthKey, PeriodCounts, WeekKey};

/// Persisted form of [`GamificationState`].
///
/// Field names match data already stored by earlier versions. Every field is
/// optional on input and defaults to its zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub xp: u64,
    /// Cached level, advisory only. `0` marks a snapshot written without the
    /// field; any other value that disagrees with `xp` is logged and replaced.
    pub level: u32,
    pub total_sessions: u64,
    /// Accumulated focus time in seconds, stored verbatim from callers.
    pub total_focus_time: i64,
    pub unlocked_achievements: BTreeSet<String>,
    pub current_streak: u32,
    pub last_completion_date: Option<NaiveDate>,
    pub daily_stats: PeriodCounts<DayKey>,
    pub weekly_stats: PeriodCounts<WeekKey>,
    pub monthly_stats: PeriodCounts<MonthKey>,
}

/// The mutable gamification aggregate for one user.
///
/// `level` is derived from `xp` through the [`LevelTable`] and cannot be set
/// independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamificationState {
    pub(crate) xp: u64,
    pub(crate) level: u32,
    pub(crate) total_sessions: u64,
    pub(crate) total_focus_seconds: i64,
    pub(crate) current_streak: u32,
    pub(crate) last_completion_date: Option<NaiveDate>,
    pub(crate) unlocked: BTreeSet<String>,
    pub(crate) daily: PeriodCounts<DayKey>,
    pub(crate) weekly: PeriodCounts<WeekKey>,
    pub(crate) monthly: PeriodCounts<MonthKey>,
}

impl GamificationState {
    /// A fresh state with no progress.
    pub fn new() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_sessions: 0,
            total_focus_seconds: 0,
            current_streak: 0,
            last_completion_date: None,
            unlocked: BTreeSet::new(),
            daily: PeriodCounts::new(),
            weekly: PeriodCounts::new(),
            monthly: PeriodCounts::new(),
        }
    }

    /// Rebuilds state from a snapshot, deriving `level` from `xp`.
    pub fn from_snapshot(snapshot: StateSnapshot, levels: &LevelTable) -> Self {
        let level = levels.level_for_xp(snapshot.xp);
        // Zero is the serde default, i.e. the field was absent.
        if snapshot.level != 0 && snapshot.level != level {
            tracing::warn!(
                xp = snapshot.xp,
                stored = snapshot.level,
                derived = level,
                "stored level disagrees with xp, using derived level"
            );
        }

        Self {
            xp: snapshot.xp,
            level,
            total_sessions: snapshot.total_sessions,
            total_focus_seconds: snapshot.total_focus_time,
            current_streak: snapshot.current_streak,
            last_completion_date: snapshot.last_completion_date,
            unlocked: snapshot.unlocked_achievements,
            daily: snapshot.daily_stats,
            weekly: snapshot.weekly_stats,
            monthly: snapshot.monthly_stats,
        }
    }

    /// Serializable copy of the full state.
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            xp: self.xp,
            level: self.level,
            total_sessions: self.total_sessions,
            total_focus_time: self.total_focus_seconds,
            unlocked_achievements: self.unlocked.clone(),
            current_streak: self.current_streak,
            last_completion_date: self.last_completion_date,
            daily_stats: self.daily.clone(),
            weekly_stats: self.weekly.clone(),
            monthly_stats: self.monthly.clone(),
        }
    }

    pub const fn xp(&self) -> u64 {
        self.xp
    }

    pub const fn level(&self) -> u32 {
        self.level
    }

    pub const fn total_sessions(&self) -> u64 {
        self.total_sessions
    }

    pub const fn total_focus_seconds(&self) -> i64 {
        self.total_focus_seconds
    }

    pub const fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub const fn last_completion_date(&self) -> Option<NaiveDate> {
        self.last_completion_date
    }

    pub const fn unlocked_achievements(&self) -> &BTreeSet<String> {
        &self.unlocked
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub const fn daily_counts(&self) -> &PeriodCounts<DayKey> {
        &self.daily
    }

    pub const fn weekly_counts(&self) -> &PeriodCounts<WeekKey> {
        &self.weekly
    }

    pub const fn monthly_counts(&self) -> &PeriodCounts<MonthKey> {
        &self.monthly
    }

    /// Sessions recorded on `date` and in its week and month.
    pub fn sessions_around(&self, date: NaiveDate) -> (u64, u64, u64) {
        (
            self.daily.get(&DayKey::new(date)),
            self.weekly.get(&WeekKey::of(date)),
            self.monthly.get(&MonthKey::of(date)),
        )
    }
}

impl Default for GamificationState {
    fn default() -> Self {
        Self::new()
    }
}
