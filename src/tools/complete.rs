//! Tools for marking and unmarking habit completions
//!
//! This module implements the habit_complete and habit_uncomplete MCP tools.
//! Both are idempotent: repeating a call for the same day changes nothing and
//! reports that nothing changed.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::storage::HabitStorage;
use crate::tools::{load_visible_habit, HabitSummary, ToolContext, ToolError};

/// Parameters for marking or unmarking a completion
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CompleteHabitParams {
    pub habit_id: String,
    /// YYYY-MM-DD or an RFC 3339 timestamp; defaults to now
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteHabitResponse {
    /// Whether the call changed anything
    pub changed: bool,
    pub message: String,
    pub habit: HabitSummary,
    /// Encouragement based on the streak after this call
    pub encouragement: String,
}

/// Record a completion for the day `params.date` falls on
pub fn complete_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: CompleteHabitParams,
) -> Result<CompleteHabitResponse, ToolError> {
    let at = completion_instant(ctx, params.date.as_deref())?;
    let mut habit = load_visible_habit(storage, ctx, &params.habit_id)?;

    let changed = habit.mark_complete(at, &ctx.calendar);
    let message = if changed {
        storage.save_progress(&habit)?;
        info!(
            "Marked '{}' complete for {} (streak {})",
            habit.name,
            ctx.calendar.day_of(at),
            habit.streak.current_streak()
        );
        "Habit marked as complete"
    } else {
        debug!("'{}' already complete for {}", habit.name, ctx.calendar.day_of(at));
        "Already completed today"
    };

    Ok(CompleteHabitResponse {
        changed,
        message: message.to_string(),
        encouragement: habit.streak.motivational_message(ctx.today()),
        habit: HabitSummary::new(&habit, ctx.today()),
    })
}

/// Remove the completion for the day `params.date` falls on
pub fn uncomplete_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: CompleteHabitParams,
) -> Result<CompleteHabitResponse, ToolError> {
    let at = completion_instant(ctx, params.date.as_deref())?;
    let mut habit = load_visible_habit(storage, ctx, &params.habit_id)?;

    let changed = habit.unmark_complete(at, &ctx.calendar);
    let message = if changed {
        storage.save_progress(&habit)?;
        info!(
            "Unmarked '{}' for {} (streak {})",
            habit.name,
            ctx.calendar.day_of(at),
            habit.streak.current_streak()
        );
        "Habit unmarked"
    } else {
        "Habit was not completed on that day"
    };

    Ok(CompleteHabitResponse {
        changed,
        message: message.to_string(),
        encouragement: habit.streak.motivational_message(ctx.today()),
        habit: HabitSummary::new(&habit, ctx.today()),
    })
}

/// Resolve the optional date parameter, rejecting days after today
fn completion_instant(ctx: &ToolContext, date: Option<&str>) -> Result<DateTime<Utc>, ToolError> {
    let at = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(value) => ctx
            .calendar
            .parse_instant(value)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?,
        None => ctx.calendar.now(),
    };

    let day = ctx.calendar.day_of(at);
    if day > ctx.today() {
        return Err(ToolError::InvalidParams(format!(
            "Cannot record a completion for a future date ({})",
            day
        )));
    }
    Ok(at)
}
