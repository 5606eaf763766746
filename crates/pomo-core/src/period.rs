//! Canonical period keys and the per-period completion counters keyed by them.
//!
//! The string forms are a persistence contract: existing buckets were written
//! with exactly these formats, so changing them orphans historical counts.
//!
//! - Daily: `YYYY-MM-DD`
//! - Weekly: `YYYY-Www`, where `ww` is the Sunday-based week of the calendar
//!   year (`00` for days before the first Sunday, up to `53`)
//! - Monthly: `YYYY-MM`
//!
//! # Week numbering
//!
//! Weekly keys are not ISO weeks. A week that straddles New Year is split
//! into two keys (e.g. `2025-W52` and `2026-W00`), so a weekly count around
//! the boundary only reflects the days on one side of it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for period key strings that do not match the canonical format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind} key: {value}")]
pub struct PeriodKeyError {
    kind: &'static str,
    value: String,
}

impl PeriodKeyError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = PeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| PeriodKeyError::new("day", s))?;
        canonical("day", key, s)
    }
}

/// A Sunday-based week of a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    /// The week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let days_before_sunday = date.weekday().num_days_from_sunday();
        Self {
            year: date.year(),
            week: (date.ordinal0() + 7 - days_before_sunday) / 7,
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn week(self) -> u32 {
        self.week
    }

    /// Chart label, e.g. `Week 07`.
    pub fn label(self) -> String {
        format!("Week {:02}", self.week)
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = PeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodKeyError::new("week", s);
        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let week = week.parse().map_err(|_| invalid())?;
        if week > 53 {
            return Err(invalid());
        }
        canonical("week", Self { year, week }, s)
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    /// The month before this one, rolling over into the previous year.
    /// `None` before the earliest representable year.
    pub const fn previous(self) -> Option<Self> {
        if self.month > 1 {
            return Some(Self {
                year: self.year,
                month: self.month - 1,
            });
        }
        match self.year.checked_sub(1) {
            Some(year) => Some(Self { year, month: 12 }),
            None => None,
        }
    }

    /// Chart label, e.g. `Oct 2026`.
    pub fn label(self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map_or_else(|| self.to_string(), |d| d.format("%b %Y").to_string())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = PeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodKeyError::new("month", s);
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        canonical("month", Self { year, month }, s)
    }
}

/// Accepts `key` only if `s` is exactly its display form, so every period has
/// a single spelling.
fn canonical<K: fmt::Display>(kind: &'static str, key: K, s: &str) -> Result<K, PeriodKeyError> {
    if key.to_string() == s {
        Ok(key)
    } else {
        Err(PeriodKeyError::new(kind, s))
    }
}

/// Serializes a key through its `Display`/`FromStr` string form.
macro_rules! string_serde {
    ($($name:ident),+ $(,)?) => {
        $(
            impl Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

string_serde!(DayKey, WeekKey, MonthKey);

/// Completion counts per period. Unknown periods count as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodCounts<K: Ord>(BTreeMap<K, u64>);

impl<K: Ord> PeriodCounts<K> {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The count recorded for `key`, or 0.
    pub fn get(&self, key: &K) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Adds one completion to `key`'s count and returns the new count.
    pub fn increment(&mut self, key: K) -> u64 {
        let count = self.0.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}

impl<K: Ord> Default for PeriodCounts<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<(K, u64)> for PeriodCounts<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
