//! SQLite-based daily statistics.
//!
//! Each calendar day has one bucket holding the number of completed focus
//! sessions and the focus minutes logged that day. The phase engine knows
//! nothing about dates; bucketing happens here.

use std::path::Path;

use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::{data_dir, migrations};
use crate::effects::StatsSink;
use crate::error::{DatabaseError, EffectError, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub day: NaiveDate,
    /// Short weekday name, e.g. "Mon".
    pub label: String,
    pub pomodoros: u64,
    pub minutes: u64,
}

impl DayStats {
    fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            label: day.format("%a").to_string(),
            pomodoros: 0,
            minutes: 0,
        }
    }
}

/// SQLite database for daily focus statistics.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/aether/aether.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("aether.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Count one completed focus session on `day`.
    pub fn increment_pomodoro(&self, day: NaiveDate) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO daily_stats (day, pomodoros, minutes, updated_at)
             VALUES (?1, 1, 0, ?2)
             ON CONFLICT(day) DO UPDATE SET
                pomodoros = pomodoros + 1,
                updated_at = excluded.updated_at",
            params![day.format(DAY_FORMAT).to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Add focus minutes to `day`. Zero is ignored.
    pub fn add_minutes(&self, day: NaiveDate, minutes: u64) -> Result<(), DatabaseError> {
        if minutes == 0 {
            return Ok(());
        }
        self.conn.execute(
            "INSERT INTO daily_stats (day, pomodoros, minutes, updated_at)
             VALUES (?1, 0, ?2, ?3)
             ON CONFLICT(day) DO UPDATE SET
                minutes = minutes + excluded.minutes,
                updated_at = excluded.updated_at",
            params![
                day.format(DAY_FORMAT).to_string(),
                minutes,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn day_stats(&self, day: NaiveDate) -> Result<DayStats, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT pomodoros, minutes FROM daily_stats WHERE day = ?1",
                params![day.format(DAY_FORMAT).to_string()],
                |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
            )
            .optional()?;

        let mut stats = DayStats::empty(day);
        if let Some((pomodoros, minutes)) = row {
            stats.pomodoros = pomodoros;
            stats.minutes = minutes;
        }
        Ok(stats)
    }

    /// `days` consecutive buckets ending at `end`, oldest first. Days with no
    /// activity are zero-filled.
    ///
    /// # Errors
    /// Returns `DateOutOfRange` if the first day falls outside chrono's calendar.
    pub fn range(&self, end: NaiveDate, days: u32) -> Result<Vec<DayStats>, DatabaseError> {
        let out_of_range = || DatabaseError::DateOutOfRange { end, days };
        (0..i64::from(days))
            .rev()
            .map(|back| {
                let day = end
                    .checked_sub_signed(Duration::days(back))
                    .ok_or_else(out_of_range)?;
                self.day_stats(day)
            })
            .collect()
    }

    /// Sunday-to-Saturday week containing `day`.
    pub fn week(&self, day: NaiveDate) -> Result<Vec<DayStats>, DatabaseError> {
        let sunday = day - Duration::days(i64::from(day.weekday().num_days_from_sunday()));
        self.range(sunday + Duration::days(6), 7)
    }

    /// Delete every bucket.
    pub fn reset(&self) -> Result<(), DatabaseError> {
        self.conn.execute("DELETE FROM daily_stats", [])?;
        Ok(())
    }
}

impl StatsSink for Database {
    fn session_completed(&mut self) -> Result<(), EffectError> {
        self.increment_pomodoro(Local::now().date_naive())?;
        Ok(())
    }

    fn minutes_elapsed(&mut self, minutes: u64) -> Result<(), EffectError> {
        self.add_minutes(Local::now().date_naive(), minutes)?;
        Ok(())
    }
}
