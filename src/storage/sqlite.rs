//! SQLite implementation of the habit storage interface
//!
//! This module provides the concrete SQLite implementation for storing and
//! retrieving habits. It handles all SQL queries and data conversion.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::domain::{
    Completion, CompletionSet, Frequency, Habit, HabitColor, HabitDetails, HabitId, StreakTracker, UserId,
};
use crate::storage::{migrations, HabitStorage, StorageError};

const DAY_FORMAT: &str = "%Y-%m-%d";

const HABIT_COLUMNS: &str = "id, user_id, name, description, color, icon, frequency, target_per_week, \
     current_streak, longest_streak, last_completed, total_completions, created_at, updated_at, is_deleted";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Throwaway database, mostly for tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys = ON")
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    /// Completions for a single habit in day order
    fn load_completions(&self, habit_id: &str) -> Result<Vec<Completion>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT day, recorded_at FROM habit_completions WHERE habit_id = ?1 ORDER BY day",
        )?;
        let rows = stmt.query_map(params![habit_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut completions = Vec::new();
        for row in rows {
            let (day, recorded_at) = row?;
            completions.push(Completion::new(parse_day(&day)?, parse_instant(&recorded_at)?));
        }
        Ok(completions)
    }

    fn insert_completions(conn: &Connection, habit: &Habit) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(
            "INSERT INTO habit_completions (habit_id, day, recorded_at) VALUES (?1, ?2, ?3)",
        )?;
        let habit_id = habit.id.to_string();
        for completion in habit.streak.completions().iter() {
            stmt.execute(params![
                habit_id,
                completion.day.format(DAY_FORMAT).to_string(),
                completion.recorded_at.to_rfc3339(),
            ])?;
        }
        Ok(())
    }
}

/// Raw `habits` row before validation of stored values
struct HabitRow {
    id: String,
    user_id: String,
    name: String,
    description: String,
    color: String,
    icon: String,
    frequency: String,
    target_per_week: u8,
    current_streak: u32,
    longest_streak: u32,
    last_completed: Option<String>,
    total_completions: u32,
    created_at: String,
    updated_at: String,
    is_deleted: bool,
}

impl HabitRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            color: row.get(4)?,
            icon: row.get(5)?,
            frequency: row.get(6)?,
            target_per_week: row.get(7)?,
            current_streak: row.get(8)?,
            longest_streak: row.get(9)?,
            last_completed: row.get(10)?,
            total_completions: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
            is_deleted: row.get(14)?,
        })
    }

    fn into_habit(self, completions: Vec<Completion>) -> Result<Habit, StorageError> {
        let id = HabitId::from_string(&self.id)
            .map_err(|e| StorageError::Corrupt(format!("habit id '{}': {}", self.id, e)))?;
        let color = HabitColor::from_hex(&self.color).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let frequency = Frequency::parse(&self.frequency).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let last_completed = self.last_completed.as_deref().map(parse_day).transpose()?;

        let streak = StreakTracker::from_existing(
            CompletionSet::from(completions),
            self.current_streak,
            self.longest_streak,
            last_completed,
            self.total_completions,
        );

        let details = HabitDetails {
            name: self.name,
            description: self.description,
            color,
            icon: self.icon,
            frequency,
            target_per_week: self.target_per_week,
        };

        Ok(Habit::from_existing(
            id,
            UserId::new(self.user_id),
            details,
            parse_instant(&self.created_at)?,
            parse_instant(&self.updated_at)?,
            self.is_deleted,
            streak,
        ))
    }
}

fn parse_day(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|e| StorageError::Corrupt(format!("day '{}': {}", value, e)))
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("timestamp '{}': {}", value, e)))
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO habits ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                HABIT_COLUMNS
            ),
            params![
                habit.id.to_string(),
                habit.user_id.as_str(),
                habit.name,
                habit.description,
                habit.color.as_hex(),
                habit.icon,
                habit.frequency.as_str(),
                habit.target_per_week,
                habit.streak.current_streak(),
                habit.streak.longest_streak(),
                habit.streak.last_completed().map(|d| d.format(DAY_FORMAT).to_string()),
                habit.streak.total_completions(),
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
                habit.is_deleted,
            ],
        )?;
        Self::insert_completions(&tx, habit)?;
        tx.commit()?;

        debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let id = habit_id.to_string();
        let result = self.conn.query_row(
            &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
            params![id],
            HabitRow::from_row,
        );

        let row = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StorageError::HabitNotFound { habit_id: id });
            }
            Err(e) => return Err(StorageError::Query(e)),
        };

        let completions = self.load_completions(&id)?;
        row.into_habit(completions)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                description = ?3,
                color = ?4,
                icon = ?5,
                frequency = ?6,
                target_per_week = ?7,
                updated_at = ?8
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.color.as_hex(),
                habit.icon,
                habit.frequency.as_str(),
                habit.target_per_week,
                habit.updated_at.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId, deleted_at: DateTime<Utc>) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET is_deleted = TRUE, updated_at = ?2 WHERE id = ?1",
            params![habit_id.to_string(), deleted_at.to_rfc3339()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        debug!("Soft-deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self, user_id: &UserId, include_deleted: bool) -> Result<Vec<Habit>, StorageError> {
        let mut completions: HashMap<String, Vec<Completion>> = HashMap::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT c.habit_id, c.day, c.recorded_at
                 FROM habit_completions c
                 JOIN habits h ON h.id = c.habit_id
                 WHERE h.user_id = ?1 AND (?2 OR h.is_deleted = FALSE)
                 ORDER BY c.habit_id, c.day",
            )?;
            let rows = stmt.query_map(params![user_id.as_str(), include_deleted], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;
            for row in rows {
                let (habit_id, day, recorded_at) = row?;
                completions
                    .entry(habit_id)
                    .or_default()
                    .push(Completion::new(parse_day(&day)?, parse_instant(&recorded_at)?));
            }
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM habits
             WHERE user_id = ?1 AND (?2 OR is_deleted = FALSE)
             ORDER BY created_at, id",
            HABIT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![user_id.as_str(), include_deleted], HabitRow::from_row)?;

        let mut habits = Vec::new();
        for row in rows {
            let row = row?;
            let habit_completions = completions.remove(&row.id).unwrap_or_default();
            habits.push(row.into_habit(habit_completions)?);
        }

        debug!("Listed {} habits for user {}", habits.len(), user_id);
        Ok(habits)
    }

    fn save_progress(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let rows_affected = tx.execute(
            "UPDATE habits SET
                current_streak = ?2,
                longest_streak = ?3,
                last_completed = ?4,
                total_completions = ?5,
                updated_at = ?6
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.streak.current_streak(),
                habit.streak.longest_streak(),
                habit.streak.last_completed().map(|d| d.format(DAY_FORMAT).to_string()),
                habit.streak.total_completions(),
                habit.updated_at.to_rfc3339(),
            ],
        )?;
        if rows_affected == 0 {
            // Dropping the transaction rolls it back
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![habit.id.to_string()],
        )?;
        Self::insert_completions(&tx, habit)?;
        tx.commit()?;

        debug!(
            "Saved progress for habit {}: streak {} (best {}), {} completions",
            habit.id,
            habit.streak.current_streak(),
            habit.streak.longest_streak(),
            habit.streak.total_completions()
        );
        Ok(())
    }

    fn count_habits(&self) -> Result<usize, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE is_deleted = FALSE",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
