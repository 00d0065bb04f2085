//! Storage layer for persisting habit data
//!
//! This module handles all database operations using SQLite. A habit is
//! stored as one `habits` row carrying its metadata and streak fields plus one
//! `habit_completions` row per completed day.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use chrono::{DateTime, Utc};

use crate::domain::{Habit, HabitId, UserId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// Tools are generic over this trait so they can run against any backend;
/// the server uses [`SqliteStorage`].
pub trait HabitStorage {
    /// Insert a new habit, including any completions it already carries
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID with its full completion set
    ///
    /// Soft-deleted habits are returned too; callers decide visibility.
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Persist edited metadata (name, colour, frequency...)
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Soft delete: the habit and its history stay in the database
    fn delete_habit(&self, habit_id: &HabitId, deleted_at: DateTime<Utc>) -> Result<(), StorageError>;

    /// All habits owned by `user_id`, oldest first
    fn list_habits(&self, user_id: &UserId, include_deleted: bool) -> Result<Vec<Habit>, StorageError>;

    /// Write the completion set and streak fields of a mutated habit atomically
    fn save_progress(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Number of non-deleted habits across all users
    fn count_habits(&self) -> Result<usize, StorageError>;
}
