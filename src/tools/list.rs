//! Tool for listing all habits
//!
//! This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::HabitStorage;
use crate::tools::{HabitSummary, ToolContext, ToolError};

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Also return soft-deleted habits
    pub include_deleted: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHabitsResponse {
    pub total: usize,
    pub completed_today: usize,
    pub habits: Vec<HabitSummary>,
}

/// List the calling user's habits, oldest first
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let today = ctx.today();
    let habits: Vec<HabitSummary> = storage
        .list_habits(&ctx.user_id, params.include_deleted.unwrap_or(false))?
        .iter()
        .map(|habit| HabitSummary::new(habit, today))
        .collect();

    Ok(ListHabitsResponse {
        total: habits.len(),
        completed_today: habits.iter().filter(|h| h.completed_today).count(),
        habits,
    })
}
