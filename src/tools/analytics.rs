//! Tool for period analytics
//!
//! This module implements the habit_analytics MCP tool.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::analytics::{AnalyticsReport, DEFAULT_PERIOD_DAYS};
use crate::storage::HabitStorage;
use crate::tools::{ToolContext, ToolError};

/// Longest accepted reporting window
pub const MAX_PERIOD_DAYS: u32 = 366;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AnalyticsParams {
    /// Number of trailing days to report on, 1-366 (default 30)
    pub period: Option<u32>,
}

/// Build the analytics report over the caller's non-deleted habits
pub fn get_analytics<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: AnalyticsParams,
) -> Result<AnalyticsReport, ToolError> {
    let period = params.period.unwrap_or(DEFAULT_PERIOD_DAYS);
    if !(1..=MAX_PERIOD_DAYS).contains(&period) {
        return Err(ToolError::InvalidParams(format!(
            "period must be between 1 and {} days, got {}",
            MAX_PERIOD_DAYS, period
        )));
    }

    let habits = storage.list_habits(&ctx.user_id, false)?;
    Ok(ctx.analytics().build_analytics(&habits, period))
}
