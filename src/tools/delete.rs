//! Tool for deleting habits
//!
//! This module implements the habit_delete MCP tool. Deletion is soft: the
//! habit disappears from listings and analytics but its rows are kept.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::storage::HabitStorage;
use crate::tools::{load_visible_habit, ToolContext, ToolError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit = load_visible_habit(storage, ctx, &params.habit_id)?;
    storage.delete_habit(&habit.id, ctx.calendar.now())?;
    info!("Deleted habit '{}' ({})", habit.name, habit.id);

    Ok(DeleteHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("Habit '{}' deleted", habit.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Calendar, HabitId, UserId};
    use crate::storage::SqliteStorage;
    use crate::tools::{create_habit, CreateHabitParams};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_delete_twice() {
        let storage = SqliteStorage::in_memory().unwrap();
        let ctx = ToolContext::new(
            UserId::new("alice"),
            Calendar::fixed(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()),
        );
        let habit_id = create_habit(
            &storage,
            &ctx,
            CreateHabitParams {
                name: "Floss".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
        .habit_id;

        let params = DeleteHabitParams { habit_id: habit_id.clone() };
        assert!(delete_habit(&storage, &ctx, params).unwrap().success);

        let stored = storage.get_habit(&HabitId::from_string(&habit_id).unwrap()).unwrap();
        assert!(stored.is_deleted);
        assert_eq!(stored.updated_at, ctx.calendar.now());

        // Already deleted habits are invisible
        let params = DeleteHabitParams { habit_id };
        assert!(delete_habit(&storage, &ctx, params).is_err());
    }
}
