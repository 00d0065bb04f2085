//! Tool for updating existing habits
//!
//! This module implements the habit_update MCP tool. Only the fields present
//! in the request are changed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::HabitChanges;
use crate::storage::HabitStorage;
use crate::tools::{load_visible_habit, parse_color, parse_frequency, HabitSummary, ToolContext, ToolError};

/// Parameters for updating a habit
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    /// daily, weekly or custom
    pub frequency: Option<String>,
    pub target_per_week: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
    pub habit: HabitSummary,
}

/// Update a habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let changes = HabitChanges {
        name: params.name,
        description: params.description,
        color: parse_color(params.color.as_deref())?,
        icon: params.icon,
        frequency: parse_frequency(params.frequency.as_deref())?,
        target_per_week: params.target_per_week,
    };
    if changes.is_empty() {
        return Err(ToolError::InvalidParams(
            "No fields to update. Provide at least one of: name, description, color, icon, frequency, target_per_week"
                .to_string(),
        ));
    }

    let mut habit = load_visible_habit(storage, ctx, &params.habit_id)?;
    habit.update(changes, ctx.calendar.now())?;
    storage.update_habit(&habit)?;
    info!("Updated habit '{}' ({})", habit.name, habit.id);

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Updated habit '{}'", habit.name),
        habit: HabitSummary::new(&habit, ctx.today()),
    })
}
