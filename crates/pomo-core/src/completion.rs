//! Applying a completed focus session to gamification state.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;

use crate::achievement::{AchievementInfo, AchievementRegistry};
use crate::level::LevelTable;
use crate::period::{DayKey, MonthKey, WeekKey};
use crate::state::GamificationState;
use crate::stats::StatsProjector;

/// XP awarded for every completed session.
pub const XP_PER_COMPLETION: u64 = 50;

/// What a single completion changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub xp_gained: u64,
    pub new_total_xp: u64,
    pub new_level: u32,
    pub leveled_up: bool,
    /// Achievements unlocked by this completion, in registry order.
    pub newly_unlocked_achievements: Vec<AchievementInfo>,
    pub updated_streak_days: u32,
}

impl CompletionResult {
    /// Ids of the achievements unlocked by this completion.
    pub fn unlocked_ids(&self) -> Vec<&str> {
        self.newly_unlocked_achievements
            .iter()
            .map(|a| a.id.as_str())
            .collect()
    }
}

/// Orchestrates one completion event against a state.
#[derive(Debug, Clone, Copy)]
pub struct CompletionProcessor<'a> {
    levels: &'a LevelTable,
    achievements: &'a AchievementRegistry,
}

impl<'a> CompletionProcessor<'a> {
    pub const fn new(levels: &'a LevelTable, achievements: &'a AchievementRegistry) -> Self {
        Self {
            levels,
            achievements,
        }
    }

    /// Records a completed session of `focus_seconds` at `now`.
    ///
    /// `focus_seconds` is accumulated verbatim, including zero or negative
    /// values. The calendar day is taken from `now` in its own time zone.
    pub fn complete<Tz: TimeZone>(
        &self,
        state: &mut GamificationState,
        focus_seconds: i64,
        now: &DateTime<Tz>,
    ) -> CompletionResult {
        let today = now.date_naive();
        let old_level = state.level;

        state.xp = state.xp.saturating_add(XP_PER_COMPLETION);
        state.total_sessions = state.total_sessions.saturating_add(1);
        state.total_focus_seconds = state.total_focus_seconds.saturating_add(focus_seconds);

        state.daily.increment(DayKey::new(today));
        update_streak(state, today);
        state.weekly.increment(WeekKey::of(today));
        state.monthly.increment(MonthKey::of(today));

        let new_level = self.levels.level_for_xp(state.xp);
        let leveled_up = new_level > old_level;
        state.level = new_level;
        if leveled_up {
            tracing::info!(old_level, new_level, xp = state.xp, "level up");
        }

        let stats = StatsProjector::new(self.levels, self.achievements).stats_on(state, today);
        let newly_unlocked: Vec<AchievementInfo> = self
            .achievements
            .evaluate(&stats, &state.unlocked)
            .into_iter()
            .map(|def| {
                tracing::info!(id = def.id, "achievement unlocked");
                def.info()
            })
            .collect();
        state
            .unlocked
            .extend(newly_unlocked.iter().map(|a| a.id.clone()));

        tracing::debug!(
            xp = state.xp,
            sessions = state.total_sessions,
            streak = state.current_streak,
            %today,
            "completion recorded"
        );

        CompletionResult {
            xp_gained: XP_PER_COMPLETION,
            new_total_xp: state.xp,
            new_level,
            leveled_up,
            newly_unlocked_achievements: newly_unlocked,
            updated_streak_days: state.current_streak,
        }
    }
}

/// Advances, keeps, or resets the streak for a completion on `today`.
///
/// A completion dated before the last one (clock skew) resets the streak.
fn update_streak(state: &mut GamificationState, today: NaiveDate) {
    state.current_streak = match state.last_completion_date {
        None => 1,
        Some(last) => match (today - last).num_days() {
            0 => state.current_streak,
            1 => state.current_streak.saturating_add(1),
            _ => 1,
        },
    };
    state.last_completion_date = Some(today);
}
