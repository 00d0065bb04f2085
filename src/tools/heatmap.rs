//! Tool for the contribution heatmap
//!
//! This module implements the habit_heatmap MCP tool.

use chrono::Duration;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::analytics::{HeatmapView, DEFAULT_HEATMAP_WEEKS};
use crate::storage::HabitStorage;
use crate::tools::{parse_optional_day, ToolContext, ToolError};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HeatmapParams {
    /// First day shown (YYYY-MM-DD); defaults to 52 weeks before end_date
    pub start_date: Option<String>,
    /// Last day shown (YYYY-MM-DD); defaults to today
    pub end_date: Option<String>,
}

/// Build the heatmap over the caller's non-deleted habits
pub fn get_heatmap<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: HeatmapParams,
) -> Result<HeatmapView, ToolError> {
    let end = parse_optional_day(&ctx.calendar, params.end_date.as_deref())?.unwrap_or_else(|| ctx.today());
    let start = parse_optional_day(&ctx.calendar, params.start_date.as_deref())?
        .unwrap_or_else(|| end - Duration::weeks(DEFAULT_HEATMAP_WEEKS));

    if start > end {
        return Err(ToolError::InvalidParams(format!(
            "start_date ({}) must not be after end_date ({})",
            start, end
        )));
    }

    let habits = storage.list_habits(&ctx.user_id, false)?;
    Ok(ctx.analytics().build_heatmap(&habits, start, end))
}
