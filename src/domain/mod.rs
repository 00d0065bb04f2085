//! Domain module containing core business logic and data types
//!
//! This module defines the core entities (Habit, CompletionSet, StreakTracker),
//! the calendar policy that turns instants into days, and the validation rules
//! for user-supplied habit fields.

pub mod calendar;
pub mod completion;
pub mod habit;
pub mod streak;
pub mod template;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use completion::*;
pub use habit::*;
pub use streak::*;
pub use template::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
