//! Tool for server health
//!
//! This module implements the server_health MCP tool: recent request timings
//! and failures plus a habit count from the database.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::{MetricsSnapshot, RequestMetrics};
use crate::storage::HabitStorage;
use crate::tools::{ToolContext, ToolError};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HealthParams {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub habit_count: usize,
    pub day_boundary: String,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}

pub fn server_health<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    metrics: &RequestMetrics,
    _params: HealthParams,
) -> Result<HealthResponse, ToolError> {
    Ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        habit_count: storage.count_habits()?,
        day_boundary: ctx.calendar.boundary().to_string(),
        metrics: metrics.snapshot(ctx.calendar.now()),
    })
}
