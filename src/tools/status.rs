//! Tool for checking habit status and streaks
//!
//! This module implements the habit_status MCP tool. Unlike habit_list it
//! reports the streak as of today: a streak whose last completion is older
//! than yesterday is shown as broken.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitId};
use crate::storage::HabitStorage;
use crate::tools::{load_visible_habit, ToolContext, ToolError};

/// Parameters for checking habit status
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// If omitted, returns all habits
    pub habit_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakState {
    /// Never completed
    New,
    /// Completed today
    Done,
    /// Completed yesterday; today still keeps the streak alive
    OnTrack,
    /// Last completion older than yesterday
    Broken,
}

/// Information about a single habit's status
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStatus {
    pub habit_id: HabitId,
    pub name: String,
    /// Streak as of today
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    pub last_completed: Option<NaiveDate>,
    pub status: StreakState,
    pub message: String,
}

impl HabitStatus {
    fn new(habit: &Habit, today: NaiveDate) -> Self {
        let streak = &habit.streak;
        let status = match streak.last_completed() {
            None => StreakState::New,
            Some(day) if day == today => StreakState::Done,
            Some(_) if streak.is_on_track(today) => StreakState::OnTrack,
            Some(_) => StreakState::Broken,
        };

        let message = match status {
            StreakState::Broken => format!(
                "Streak ended. Your best run was {} days; today is a good day to start again.",
                streak.longest_streak()
            ),
            _ => streak.motivational_message(today),
        };

        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            current_streak: habit.live_streak(today),
            longest_streak: streak.longest_streak(),
            total_completions: streak.total_completions(),
            last_completed: streak.last_completed(),
            status,
            message,
        }
    }
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub date: NaiveDate,
    pub habits: Vec<HabitStatus>,
    pub summary: String,
}

/// Get status for one habit or all of the caller's habits
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    ctx: &ToolContext,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let today = ctx.today();
    let habits = match params.habit_id.as_deref() {
        Some(habit_id) => vec![load_visible_habit(storage, ctx, habit_id)?],
        None => storage.list_habits(&ctx.user_id, false)?,
    };

    let statuses: Vec<HabitStatus> = habits.iter().map(|habit| HabitStatus::new(habit, today)).collect();

    let done = statuses.iter().filter(|s| s.status == StreakState::Done).count();
    let summary = if statuses.is_empty() {
        "No habits yet. Create one to start tracking!".to_string()
    } else {
        format!("{} of {} habits completed today", done, statuses.len())
    };

    Ok(StatusResponse {
        date: today,
        habits: statuses,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Calendar, HabitDetails, UserId};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_status_states() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let calendar = Calendar::fixed(Utc.with_ymd_and_hms(2024, 6, 10, 18, 0, 0).unwrap());
        let mut habit = Habit::new(UserId::new("alice"), HabitDetails::named("Run"), calendar.now()).unwrap();
        assert_eq!(HabitStatus::new(&habit, today).status, StreakState::New);

        let three_days_ago = calendar.now() - Duration::days(3);
        habit.mark_complete(three_days_ago - Duration::days(1), &calendar);
        habit.mark_complete(three_days_ago, &calendar);
        let status = HabitStatus::new(&habit, today);
        assert_eq!(status.status, StreakState::Broken);
        assert_eq!(status.current_streak, 0);
        assert_eq!(status.longest_streak, 2);

        habit.mark_complete(calendar.now() - Duration::days(1), &calendar);
        assert_eq!(HabitStatus::new(&habit, today).status, StreakState::OnTrack);

        habit.mark_complete(calendar.now(), &calendar);
        let status = HabitStatus::new(&habit, today);
        assert_eq!(status.status, StreakState::Done);
        assert_eq!(status.current_streak, 2);
    }
}
