//! Storage layer for the pomodoro timer.
//!
//! Persists one gamification snapshot per profile, plus a log of completed
//! sessions, using `rusqlite`. The engine itself never touches storage;
//! callers load a snapshot here, run an operation, and store the result.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Completions for the same profile must be serialized: load, complete, and
//! save inside one [`Database`] handle rather than interleaving handles.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC with millisecond precision
//! (e.g., `2025-01-15T09:30:00.000Z`), so lexicographic order matches
//! chronological order.
//!
//! The `snapshot` column holds the JSON form of [`StateSnapshot`]. Its period
//! keys are a persistence contract; see [`pomo_core::period`].

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use pomo_core::{CompletionResult, StateSnapshot};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored snapshot could not be encoded or decoded.
    #[error("invalid snapshot for profile {profile}")]
    Snapshot {
        profile: String,
        #[source]
        source: serde_json::Error,
    },
    /// A stored completion's achievement list could not be encoded or decoded.
    #[error("invalid achievement list in completion {id}")]
    Achievements {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp: {timestamp}")]
    TimestampParse {
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A stored profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

/// One logged completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub id: i64,
    pub profile: String,
    pub completed_at: DateTime<Utc>,
    pub focus_seconds: i64,
    pub xp_gained: u64,
    pub total_xp: u64,
    pub level: u32,
    pub streak_days: u32,
    /// Ids of achievements unlocked by this completion.
    pub achievements: Vec<String>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS profiles (
                name TEXT PRIMARY KEY,
                snapshot TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- completions: append-only log of recorded sessions
            -- completed_at: RFC 3339 UTC (e.g., '2025-01-15T09:30:00.000Z')
            -- achievements: JSON array of achievement ids unlocked by the completion
            CREATE TABLE IF NOT EXISTS completions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                profile TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                focus_seconds INTEGER NOT NULL,
                xp_gained INTEGER NOT NULL,
                total_xp INTEGER NOT NULL,
                level INTEGER NOT NULL,
                streak_days INTEGER NOT NULL,
                achievements TEXT NOT NULL DEFAULT '[]',
                FOREIGN KEY (profile) REFERENCES profiles(name) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_completions_profile_time
                ON completions(profile, completed_at);
            ",
        )?;
        Ok(())
    }

    /// Loads the stored snapshot for `profile`, if any.
    pub fn load_snapshot(&self, profile: &str) -> Result<Option<StateSnapshot>, DbError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT snapshot FROM profiles WHERE name = ?",
                [profile],
                |row| row.get(0),
            )
            .optional()?;

        json.map(|json| {
            serde_json::from_str(&json).map_err(|source| DbError::Snapshot {
                profile: profile.to_string(),
                source,
            })
        })
        .transpose()
    }

    /// Stores `snapshot` as the current state of `profile`.
    pub fn save_snapshot(
        &mut self,
        profile: &str,
        snapshot: &StateSnapshot,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        upsert_snapshot(&tx, profile, snapshot, updated_at)?;
        tx.commit()?;
        Ok(())
    }

    /// Stores the post-completion snapshot and logs the completion atomically.
    pub fn save_completion(
        &mut self,
        profile: &str,
        snapshot: &StateSnapshot,
        completed_at: DateTime<Utc>,
        focus_seconds: i64,
        result: &CompletionResult,
    ) -> Result<i64, DbError> {
        let tx = self.conn.transaction()?;
        upsert_snapshot(&tx, profile, snapshot, completed_at)?;
        let id = insert_completion(&tx, profile, completed_at, focus_seconds, result)?;
        tx.commit()?;
        tracing::debug!(profile, id, "completion saved");
        Ok(id)
    }

    /// Lists the most recent completions for `profile`, newest first.
    pub fn recent_completions(
        &self,
        profile: &str,
        limit: usize,
    ) -> Result<Vec<CompletionRecord>, DbError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "
            SELECT id, profile, completed_at, focus_seconds, xp_gained, total_xp, level, streak_days, achievements
            FROM completions
            WHERE profile = ?
            ORDER BY completed_at DESC, id DESC
            LIMIT ?
            ",
        )?;
        let rows = stmt.query_map(params![profile, limit], |row| {
            Ok(RawCompletion {
                id: row.get(0)?,
                profile: row.get(1)?,
                completed_at: row.get(2)?,
                focus_seconds: row.get(3)?,
                xp_gained: row.get(4)?,
                total_xp: row.get(5)?,
                level: row.get(6)?,
                streak_days: row.get(7)?,
                achievements: row.get(8)?,
            })
        })?;

        let mut completions = Vec::new();
        for row in rows {
            completions.push(row?.into_record()?);
        }
        Ok(completions)
    }

    /// Lists stored profiles ordered by name.
    pub fn list_profiles(&self) -> Result<Vec<ProfileRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, updated_at FROM profiles ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut profiles = Vec::new();
        for row in rows {
            let (name, updated_at) = row?;
            profiles.push(ProfileRecord {
                name,
                updated_at: parse_timestamp(&updated_at)?,
            });
        }
        Ok(profiles)
    }
}

/// Row shape before timestamp and JSON decoding.
struct RawCompletion {
    id: i64,
    profile: String,
    completed_at: String,
    focus_seconds: i64,
    xp_gained: u64,
    total_xp: u64,
    level: u32,
    streak_days: u32,
    achievements: String,
}

impl RawCompletion {
    fn into_record(self) -> Result<CompletionRecord, DbError> {
        let achievements =
            serde_json::from_str(&self.achievements).map_err(|source| DbError::Achievements {
                id: self.id,
                source,
            })?;
        Ok(CompletionRecord {
            id: self.id,
            profile: self.profile,
            completed_at: parse_timestamp(&self.completed_at)?,
            focus_seconds: self.focus_seconds,
            xp_gained: self.xp_gained,
            total_xp: self.total_xp,
            level: self.level,
            streak_days: self.streak_days,
            achievements,
        })
    }
}

fn upsert_snapshot(
    tx: &Transaction<'_>,
    profile: &str,
    snapshot: &StateSnapshot,
    updated_at: DateTime<Utc>,
) -> Result<(), DbError> {
    let json = serde_json::to_string(snapshot).map_err(|source| DbError::Snapshot {
        profile: profile.to_string(),
        source,
    })?;
    tx.execute(
        "
        INSERT INTO profiles (name, snapshot, updated_at) VALUES (?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET snapshot = excluded.snapshot, updated_at = excluded.updated_at
        ",
        params![profile, json, format_timestamp(updated_at)],
    )?;
    Ok(())
}

fn insert_completion(
    tx: &Transaction<'_>,
    profile: &str,
    completed_at: DateTime<Utc>,
    focus_seconds: i64,
    result: &CompletionResult,
) -> Result<i64, DbError> {
    let ids = result.unlocked_ids();
    // Serializing a list of strings cannot fail.
    let achievements = serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string());
    tx.execute(
        "
        INSERT INTO completions
        (profile, completed_at, focus_seconds, xp_gained, total_xp, level, streak_days, achievements)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
        params![
            profile,
            format_timestamp(completed_at),
            focus_seconds,
            result.xp_gained,
            result.new_total_xp,
            result.new_level,
            result.updated_streak_days,
            achievements,
        ],
    )?;
    Ok(tx.last_insert_rowid())
}

fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};
    use pomo_core::Engine;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, h, 0, 0).unwrap()
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        stmt.query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .map(Result::unwrap)
            .collect()
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(
            table_columns(&db.conn, "profiles"),
            vec!["name", "snapshot", "updated_at"]
        );
        assert_eq!(
            table_columns(&db.conn, "completions"),
            vec![
                "id",
                "profile",
                "completed_at",
                "focus_seconds",
                "xp_gained",
                "total_xp",
                "level",
                "streak_days",
                "achievements",
            ]
        );
    }

    #[test]
    fn missing_profile_has_no_snapshot() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.load_snapshot("nobody").unwrap(), None);
    }

    #[test]
    fn save_snapshot_upserts() {
        let mut db = Database::open_in_memory().unwrap();
        let first = StateSnapshot {
            xp: 50,
            ..StateSnapshot::default()
        };
        let second = StateSnapshot {
            xp: 100,
            ..StateSnapshot::default()
        };

        db.save_snapshot("default", &first, at(9)).unwrap();
        db.save_snapshot("default", &second, at(10)).unwrap();

        assert_eq!(db.load_snapshot("default").unwrap(), Some(second));
        let profiles = db.list_profiles().unwrap();
        assert_eq!(
            profiles,
            vec![ProfileRecord {
                name: "default".to_string(),
                updated_at: at(10),
            }]
        );
    }

    #[test]
    fn save_completion_logs_and_persists_state() {
        let mut db = Database::open_in_memory().unwrap();
        let engine = Engine::default();

        let mut snapshot = StateSnapshot::default();
        for hour in [9, 10] {
            let now = at(hour);
            let (result, next) = engine.record_completion(snapshot, 1500, &now);
            db.save_completion("work", &next, now, 1500, &result).unwrap();
            snapshot = next;
        }

        let stored = db.load_snapshot("work").unwrap().unwrap();
        assert_eq!(stored, snapshot);
        assert_eq!(stored.xp, 100);

        let completions = db.recent_completions("work", 10).unwrap();
        assert_eq!(completions.len(), 2);
        assert_eq!(completions[0].completed_at, at(10));
        assert_eq!(completions[0].total_xp, 100);
        assert_eq!(completions[0].level, 2);
        assert!(completions[0].achievements.is_empty());
        assert_eq!(completions[1].achievements, vec!["first_pomodoro"]);
    }

    #[test]
    fn recent_completions_respects_limit_and_profile() {
        let mut db = Database::open_in_memory().unwrap();
        let engine = Engine::default();

        for (profile, offset) in [("a", 0), ("a", 1), ("a", 2), ("b", 3)] {
            let now = at(9) + Duration::minutes(offset);
            let snapshot = db.load_snapshot(profile).unwrap().unwrap_or_default();
            let (result, next) = engine.record_completion(snapshot, 1500, &now);
            db.save_completion(profile, &next, now, 1500, &result).unwrap();
        }

        let recent = db.recent_completions("a", 2).unwrap();
        let times: Vec<_> = recent.iter().map(|c| c.completed_at).collect();
        assert_eq!(times, vec![at(9) + Duration::minutes(2), at(9) + Duration::minutes(1)]);
        assert!(recent.iter().all(|c| c.profile == "a"));

        let names: Vec<_> = db
            .list_profiles()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn snapshot_survives_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("pomo.db");
        let snapshot = StateSnapshot {
            xp: 250,
            total_sessions: 5,
            ..StateSnapshot::default()
        };

        {
            let mut db = Database::open(&path).unwrap();
            db.save_snapshot("default", &snapshot, at(9)).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.load_snapshot("default").unwrap(), Some(snapshot));
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO profiles (name, snapshot, updated_at) VALUES ('x', '{\"daily_stats\": {\"bad\": 1}}', '2025-01-15T09:00:00.000Z')",
                [],
            )
            .unwrap();

        let err = db.load_snapshot("x").unwrap_err();
        assert!(matches!(err, DbError::Snapshot { ref profile, .. } if profile == "x"));
    }
}
