//! Core engagement logic for the pomodoro timer.
//!
//! This crate turns "session completed" events into:
//! - XP and level progression
//! - Consecutive-day streaks
//! - One-time achievement unlocks
//! - Daily, weekly and monthly completion counts for charts
//!
//! It performs no I/O. Callers load a [`StateSnapshot`], run one operation
//! on an [`Engine`] with an explicit timestamp, and persist what comes back.

pub mod achievement;
mod completion;
mod engine;
pub mod level;
pub mod period;
mod state;
pub mod stats;

pub use achievement::{AchievementDefinition, AchievementInfo, AchievementRegistry, Criterion};
pub use completion::{CompletionProcessor, CompletionResult, XP_PER_COMPLETION};
pub use engine::Engine;
pub use level::{LevelTable, LevelTableError, LevelThreshold};
pub use period::{DayKey, MonthKey, PeriodCounts, PeriodKeyError, WeekKey};
pub use state::{GamificationState, StateSnapshot};
pub use stats::{
    AchievementStatus, ChartKind, ChartPoint, MAX_CHART_POINTS, Stats, StatsProjector, StatsView, UnknownChartKind,
    XpProgress,
};
