//! Level thresholds: the mapping from cumulative XP to level.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum XP per level, index 0 being level 1.
pub const DEFAULT_LEVEL_THRESHOLDS: [u64; 10] =
    [0, 100, 250, 500, 1000, 2000, 3500, 5500, 8000, 11000];

/// Errors raised while building a [`LevelTable`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelTableError {
    /// No thresholds were provided.
    #[error("level table cannot be empty")]
    Empty,

    /// Level 1 must start at zero XP.
    #[error("level 1 must require 0 XP, got {min_xp}")]
    NonZeroBase { min_xp: u64 },

    /// Levels must be numbered consecutively from 1.
    #[error("expected level {expected}, got level {found}")]
    LevelGap { expected: u32, found: u32 },

    /// Thresholds must strictly increase with level.
    #[error("level {level} requires {min_xp} XP, not more than level {previous_level} ({previous_min_xp} XP)")]
    NotIncreasing {
        level: u32,
        min_xp: u64,
        previous_level: u32,
        previous_min_xp: u64,
    },
}

/// Minimum cumulative XP required to reach a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub level: u32,
    pub min_xp: u64,
}

/// An ordered, validated level table.
///
/// Construction rejects tables that are empty, do not start at level 1 with
/// 0 XP, skip a level, or are not strictly increasing. Once built, every
/// lookup is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    thresholds: Vec<LevelThreshold>,
}

impl LevelTable {
    /// Builds a table from explicit `(level, min_xp)` pairs.
    pub fn new(thresholds: Vec<LevelThreshold>) -> Result<Self, LevelTableError> {
        let first = thresholds.first().ok_or(LevelTableError::Empty)?;
        if first.level != 1 {
            return Err(LevelTableError::LevelGap {
                expected: 1,
                found: first.level,
            });
        }
        if first.min_xp != 0 {
            return Err(LevelTableError::NonZeroBase {
                min_xp: first.min_xp,
            });
        }

        for pair in thresholds.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let expected = previous.level.saturating_add(1);
            if current.level != expected {
                return Err(LevelTableError::LevelGap {
                    expected,
                    found: current.level,
                });
            }
            if current.min_xp <= previous.min_xp {
                return Err(LevelTableError::NotIncreasing {
                    level: current.level,
                    min_xp: current.min_xp,
                    previous_level: previous.level,
                    previous_min_xp: previous.min_xp,
                });
            }
        }

        Ok(Self { thresholds })
    }

    /// Builds a table from minimum XP values, the first entry being level 1.
    pub fn from_min_xp(min_xp: &[u64]) -> Result<Self, LevelTableError> {
        let thresholds = (1..)
            .zip(min_xp)
            .map(|(level, &min_xp)| LevelThreshold { level, min_xp })
            .collect();
        Self::new(thresholds)
    }

    /// Returns the highest level whose threshold is at most `xp`.
    pub fn level_for_xp(&self, xp: u64) -> u32 {
        let reached = self.thresholds.partition_point(|t| t.min_xp <= xp);
        // Level 1 has threshold 0, so at least one entry always qualifies.
        self.thresholds[reached.saturating_sub(1)].level
    }

    /// Minimum XP for `level`, or `None` if the table has no such level.
    pub fn threshold_of(&self, level: u32) -> Option<u64> {
        self.entry(level).map(|t| t.min_xp)
    }

    /// Threshold of the level after `level`, or `None` at the maximum level.
    pub fn next_threshold(&self, level: u32) -> Option<LevelThreshold> {
        self.entry(level.checked_add(1)?).copied()
    }

    /// The highest level in the table.
    pub fn max_level(&self) -> u32 {
        self.thresholds.last().map_or(1, |t| t.level)
    }

    /// All thresholds in level order.
    pub fn thresholds(&self) -> &[LevelThreshold] {
        &self.thresholds
    }

    fn entry(&self, level: u32) -> Option<&LevelThreshold> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.thresholds.get(index)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        let thresholds = (1..)
            .zip(DEFAULT_LEVEL_THRESHOLDS)
            .map(|(level, min_xp)| LevelThreshold { level, min_xp })
            .collect();
        Self { thresholds }
    }
}
