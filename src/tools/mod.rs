//! MCP tools for habit management
//!
//! This module contains all the MCP tools that external clients can call to
//! interact with the habit tracker. Each tool takes a typed parameter struct,
//! validates it, calls into the domain and analytics layers, and returns a
//! serialisable response.

pub mod analytics;
pub mod complete;
pub mod create;
pub mod delete;
pub mod error;
pub mod health;
pub mod heatmap;
pub mod list;
pub mod status;
pub mod templates;
pub mod update;

// Re-export tool functions for easy access
pub use analytics::*;
pub use complete::*;
pub use create::*;
pub use delete::*;
pub use error::*;
pub use health::*;
pub use heatmap::*;
pub use list::*;
pub use status::*;
pub use templates::*;
pub use update::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::AnalyticsEngine;
use crate::domain::{Calendar, Frequency, Habit, HabitColor, HabitId, UserId};
use crate::storage::{HabitStorage, StorageError};

/// Who is calling and what time it is
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub user_id: UserId,
    pub calendar: Calendar,
}

impl ToolContext {
    pub fn new(user_id: UserId, calendar: Calendar) -> Self {
        Self { user_id, calendar }
    }

    pub fn analytics(&self) -> AnalyticsEngine {
        AnalyticsEngine::new(self.calendar.clone())
    }

    pub fn today(&self) -> NaiveDate {
        self.calendar.today()
    }
}

/// A habit as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub id: HabitId,
    pub name: String,
    pub description: String,
    pub color: HabitColor,
    pub icon: String,
    pub frequency: Frequency,
    pub target_per_week: u8,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed: Option<NaiveDate>,
    pub total_completions: u32,
    pub completed_today: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_deleted: bool,
}

impl HabitSummary {
    pub fn new(habit: &Habit, today: NaiveDate) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            description: habit.description.clone(),
            color: habit.color,
            icon: habit.icon.clone(),
            frequency: habit.frequency,
            target_per_week: habit.target_per_week,
            current_streak: habit.streak.current_streak(),
            longest_streak: habit.streak.longest_streak(),
            last_completed: habit.streak.last_completed(),
            total_completions: habit.streak.total_completions(),
            completed_today: habit.streak.is_completed_on(today),
            created_at: habit.created_at,
            is_deleted: habit.is_deleted,
        }
    }
}

/// Parse a client-supplied habit id
pub(crate) fn parse_habit_id(value: &str) -> Result<HabitId, ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidParams("Habit ID cannot be empty".to_string()));
    }
    HabitId::from_string(value)
        .map_err(|_| ToolError::InvalidParams(format!("Invalid habit ID format: '{}'", value)))
}

/// Load a habit the caller is allowed to see
///
/// Habits of other users and soft-deleted habits are reported as not found.
pub(crate) fn load_visible_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    habit_id: &str,
) -> Result<Habit, ToolError> {
    let id = parse_habit_id(habit_id)?;
    let habit = storage.get_habit(&id)?;
    if habit.user_id != ctx.user_id || habit.is_deleted {
        return Err(StorageError::HabitNotFound {
            habit_id: id.to_string(),
        }
        .into());
    }
    Ok(habit)
}

pub(crate) fn parse_color(value: Option<&str>) -> Result<Option<HabitColor>, ToolError> {
    Ok(value.map(HabitColor::from_hex).transpose()?)
}

pub(crate) fn parse_frequency(value: Option<&str>) -> Result<Option<Frequency>, ToolError> {
    Ok(value.map(Frequency::parse).transpose()?)
}

/// Parse an optional date; `None` stays `None`
pub(crate) fn parse_optional_day(calendar: &Calendar, value: Option<&str>) -> Result<Option<NaiveDate>, ToolError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| calendar.parse_day(v))
        .transpose()
        .map_err(|e| ToolError::InvalidParams(e.to_string()))
}
