//! Snapshot-in, snapshot-out entry points used by the hosting layer.
//!
//! Each call rebuilds a [`GamificationState`] from the caller's snapshot,
//! runs one operation, and (for completions) hands back the updated
//! snapshot for the caller to persist. The caller supplies "now" so every
//! call is deterministic.

use chrono::{DateTime, TimeZone};

use crate::achievement::AchievementRegistry;
use crate::completion::{CompletionProcessor, CompletionResult};
use crate::level::{LevelTable, LevelTableError};
use crate::state::{GamificationState, StateSnapshot};
use crate::stats::{ChartKind, ChartPoint, StatsProjector, StatsView, XpProgress};

/// Level table and achievement catalogue shared by all operations.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    levels: LevelTable,
    achievements: AchievementRegistry,
}

impl Engine {
    pub const fn new(levels: LevelTable, achievements: AchievementRegistry) -> Self {
        Self {
            levels,
            achievements,
        }
    }

    /// An engine with the built-in achievements and custom level thresholds.
    pub fn with_level_thresholds(min_xp: &[u64]) -> Result<Self, LevelTableError> {
        Ok(Self::new(
            LevelTable::from_min_xp(min_xp)?,
            AchievementRegistry::default(),
        ))
    }

    pub const fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub const fn achievements(&self) -> &AchievementRegistry {
        &self.achievements
    }

    pub const fn processor(&self) -> CompletionProcessor<'_> {
        CompletionProcessor::new(&self.levels, &self.achievements)
    }

    pub const fn projector(&self) -> StatsProjector<'_> {
        StatsProjector::new(&self.levels, &self.achievements)
    }

    pub fn load(&self, snapshot: StateSnapshot) -> GamificationState {
        GamificationState::from_snapshot(snapshot, &self.levels)
    }

    /// Applies one completed session and returns the result with the
    /// snapshot to persist.
    pub fn record_completion<Tz: TimeZone>(
        &self,
        snapshot: StateSnapshot,
        focus_seconds: i64,
        now: &DateTime<Tz>,
    ) -> (CompletionResult, StateSnapshot) {
        let mut state = self.load(snapshot);
        let result = self.processor().complete(&mut state, focus_seconds, now);
        (result, state.to_snapshot())
    }

    pub fn get_stats<Tz: TimeZone>(&self, snapshot: StateSnapshot, now: &DateTime<Tz>) -> StatsView {
        self.projector().snapshot(&self.load(snapshot), now)
    }

    pub fn get_xp_progress(&self, snapshot: StateSnapshot) -> XpProgress {
        self.projector().xp_progress(&self.load(snapshot))
    }

    pub fn get_chart_series<Tz: TimeZone>(
        &self,
        snapshot: StateSnapshot,
        kind: ChartKind,
        count: usize,
        now: &DateTime<Tz>,
    ) -> Vec<ChartPoint> {
        self.projector()
            .chart_series(&self.load(snapshot), kind, count, now)
    }
}
