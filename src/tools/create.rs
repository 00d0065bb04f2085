//! Tool for creating new habits
//!
//! This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Habit, HabitDetails, DEFAULT_ICON, DEFAULT_TARGET_PER_WEEK};
use crate::storage::HabitStorage;
use crate::tools::{parse_color, parse_frequency, HabitSummary, ToolContext, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Display name, 1-100 characters
    pub name: String,
    /// Optional longer description, up to 500 characters
    pub description: Option<String>,
    /// One of #13ec6a, #3b82f6, #f59e0b, #ef4444, #8b5cf6, #ec4899, #14b8a6, #f97316
    pub color: Option<String>,
    /// Icon name (defaults to check_circle)
    pub icon: Option<String>,
    /// daily, weekly or custom
    pub frequency: Option<String>,
    /// Days per week the habit should be done (1-7, default 7)
    pub target_per_week: Option<u8>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
    pub habit: HabitSummary,
}

/// Create a new habit for the calling user
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let details = HabitDetails {
        name: params.name,
        description: params.description.unwrap_or_default(),
        color: parse_color(params.color.as_deref())?.unwrap_or_default(),
        icon: params.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        frequency: parse_frequency(params.frequency.as_deref())?.unwrap_or_default(),
        target_per_week: params.target_per_week.unwrap_or(DEFAULT_TARGET_PER_WEEK),
    };

    let habit = Habit::new(ctx.user_id.clone(), details, ctx.calendar.now())?;
    storage.create_habit(&habit)?;
    info!("Created habit '{}' ({}) for {}", habit.name, habit.id, habit.user_id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("Created habit '{}'! Ready to start your streak!", habit.name),
        habit: HabitSummary::new(&habit, ctx.today()),
    })
}
