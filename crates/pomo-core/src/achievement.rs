//! One-time achievements and the registry that decides when they unlock.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::stats::Stats;

/// The condition under which an achievement unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// Lifetime completed sessions reach the given count.
    TotalSessionsAtLeast(u64),
    /// The consecutive-day streak reaches the given length.
    StreakAtLeast(u32),
    /// Sessions in the current week reach the given count.
    WeekSessionsAtLeast(u64),
}

impl Criterion {
    /// Evaluates the criterion against a stats snapshot.
    pub const fn is_met(self, stats: &Stats) -> bool {
        match self {
            Self::TotalSessionsAtLeast(n) => stats.total_sessions >= n,
            Self::StreakAtLeast(n) => stats.current_streak >= n,
            Self::WeekSessionsAtLeast(n) => stats.this_week_sessions >= n,
        }
    }
}

/// A single achievement definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementDefinition {
    /// Stable identifier persisted in unlocked sets.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub criterion: Criterion,
}

impl AchievementDefinition {
    pub fn info(&self) -> AchievementInfo {
        AchievementInfo {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Display metadata for an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

const BUILTIN: [AchievementDefinition; 7] = [
    AchievementDefinition {
        id: "first_pomodoro",
        name: "First Steps",
        description: "Complete your first Pomodoro",
        criterion: Criterion::TotalSessionsAtLeast(1),
    },
    AchievementDefinition {
        id: "streak_3",
        name: "3 Day Streak",
        description: "Complete Pomodoros for 3 consecutive days",
        criterion: Criterion::StreakAtLeast(3),
    },
    AchievementDefinition {
        id: "streak_7",
        name: "Week Warrior",
        description: "Complete Pomodoros for 7 consecutive days",
        criterion: Criterion::StreakAtLeast(7),
    },
    AchievementDefinition {
        id: "weekly_10",
        name: "Productive Week",
        description: "Complete 10 Pomodoros in a week",
        criterion: Criterion::WeekSessionsAtLeast(10),
    },
    AchievementDefinition {
        id: "weekly_25",
        name: "Power Week",
        description: "Complete 25 Pomodoros in a week",
        criterion: Criterion::WeekSessionsAtLeast(25),
    },
    AchievementDefinition {
        id: "total_50",
        name: "Century Club",
        description: "Complete 50 total Pomodoros",
        criterion: Criterion::TotalSessionsAtLeast(50),
    },
    AchievementDefinition {
        id: "total_100",
        name: "Centurion",
        description: "Complete 100 total Pomodoros",
        criterion: Criterion::TotalSessionsAtLeast(100),
    },
];

/// An ordered set of achievement definitions.
///
/// Iteration order is the tie-break for achievements unlocked by the same
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementRegistry {
    definitions: Vec<AchievementDefinition>,
}

impl AchievementRegistry {
    /// Builds a registry, keeping the first definition for any repeated id.
    pub fn new(definitions: impl IntoIterator<Item = AchievementDefinition>) -> Self {
        let mut seen = BTreeSet::new();
        let definitions = definitions
            .into_iter()
            .filter(|d| seen.insert(d.id))
            .collect();
        Self { definitions }
    }

    /// Definitions whose criterion now holds and whose id is not yet unlocked,
    /// in registry order.
    pub fn evaluate<'a>(
        &'a self,
        stats: &Stats,
        already_unlocked: &BTreeSet<String>,
    ) -> Vec<&'a AchievementDefinition> {
        self.definitions
            .iter()
            .filter(|d| !already_unlocked.contains(d.id))
            .filter(|d| d.criterion.is_met(stats))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&AchievementDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AchievementDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for AchievementRegistry {
    fn default() -> Self {
        Self::new(BUILTIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total_sessions: u64, current_streak: u32, this_week_sessions: u64) -> Stats {
        Stats {
            total_sessions,
            current_streak,
            this_week_sessions,
            ..Stats::default()
        }
    }

    fn ids(defs: &[&AchievementDefinition]) -> Vec<&'static str> {
        defs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn nothing_unlocks_from_empty_stats() {
        let registry = AchievementRegistry::default();
        assert!(registry.evaluate(&Stats::default(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn first_session_unlocks_first_pomodoro() {
        let registry = AchievementRegistry::default();
        let unlocked = registry.evaluate(&stats(1, 1, 1), &BTreeSet::new());
        assert_eq!(ids(&unlocked), vec!["first_pomodoro"]);
    }

    #[test]
    fn simultaneous_unlocks_follow_registry_order() {
        let registry = AchievementRegistry::default();
        let unlocked = registry.evaluate(&stats(100, 7, 25), &BTreeSet::new());
        assert_eq!(
            ids(&unlocked),
            vec![
                "first_pomodoro",
                "streak_3",
                "streak_7",
                "weekly_10",
                "weekly_25",
                "total_50",
                "total_100",
            ]
        );
    }

    #[test]
    fn already_unlocked_ids_are_skipped() {
        let registry = AchievementRegistry::default();
        let already: BTreeSet<String> = ["first_pomodoro".to_string(), "streak_3".to_string()]
            .into_iter()
            .collect();
        let unlocked = registry.evaluate(&stats(5, 3, 1), &already);
        assert!(unlocked.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first_definition() {
        let first = AchievementDefinition {
            id: "dup",
            name: "First",
            description: "",
            criterion: Criterion::TotalSessionsAtLeast(1),
        };
        let second = AchievementDefinition {
            name: "Second",
            ..first.clone()
        };
        let registry = AchievementRegistry::new([first, second]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("dup").map(|d| d.name), Some("First"));
    }

    #[test]
    fn criteria_thresholds_are_inclusive() {
        assert!(Criterion::StreakAtLeast(3).is_met(&stats(0, 3, 0)));
        assert!(!Criterion::StreakAtLeast(3).is_met(&stats(0, 2, 0)));
        assert!(Criterion::WeekSessionsAtLeast(10).is_met(&stats(0, 0, 10)));
        assert!(!Criterion::TotalSessionsAtLeast(50).is_met(&stats(49, 0, 0)));
    }
}
