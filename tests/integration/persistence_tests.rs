/// Habits and their streaks survive reopening the database
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use habit_streak_mcp::tools::{self, CompleteHabitParams, CreateHabitParams, ListHabitsParams};
use habit_streak_mcp::*;
use tempfile::NamedTempFile;

fn ctx_at(now: DateTime<Utc>) -> ToolContext {
    ToolContext::new(UserId::new("alice"), Calendar::fixed(now))
}

fn complete(storage: &SqliteStorage, ctx: &ToolContext, habit_id: &str, date: &str) {
    tools::complete_habit(
        storage,
        ctx,
        CompleteHabitParams {
            habit_id: habit_id.to_string(),
            date: Some(date.to_string()),
        },
    )
    .expect("Failed to complete habit");
}

#[test]
fn test_server_opens_file_database() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let config = ServerConfig::new(temp_file.path().to_path_buf()).with_user(UserId::new("alice"));

    let server = HabitStreakServer::new(config.clone()).expect("Failed to create server");
    assert_eq!(server.storage().count_habits().unwrap(), 0);
    assert_eq!(server.context().user_id.as_str(), "alice");

    // Migrations are idempotent
    HabitStreakServer::new(config).expect("Failed to reopen server");
}

#[test]
fn test_streaks_survive_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp_file.path().to_path_buf();
    let ctx = ctx_at(Utc.with_ymd_and_hms(2024, 1, 4, 9, 0, 0).unwrap());

    let habit_id = {
        let storage = SqliteStorage::new(path.clone()).expect("Failed to create storage");
        let created = tools::create_habit(
            &storage,
            &ctx,
            CreateHabitParams {
                name: "Stretch".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            complete(&storage, &ctx, &created.habit_id, date);
        }
        tools::uncomplete_habit(
            &storage,
            &ctx,
            CompleteHabitParams {
                habit_id: created.habit_id.clone(),
                date: Some("2024-01-02".to_string()),
            },
        )
        .unwrap();
        created.habit_id
    };

    let storage = SqliteStorage::new(path).expect("Failed to reopen storage");
    let habit = storage
        .get_habit(&HabitId::from_string(&habit_id).unwrap())
        .unwrap();

    assert_eq!(habit.streak.current_streak(), 1);
    assert_eq!(habit.streak.longest_streak(), 3);
    assert_eq!(habit.streak.total_completions(), 2);
    assert_eq!(habit.streak.last_completed(), NaiveDate::from_ymd_opt(2024, 1, 3));
    assert!(!habit.streak.is_completed_on(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
}

#[test]
fn test_deleted_habits_hidden_from_list() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path().to_path_buf()).unwrap();
    let ctx = ctx_at(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap());

    let mut ids = Vec::new();
    for name in ["Run", "Read"] {
        let params = CreateHabitParams {
            name: name.to_string(),
            ..Default::default()
        };
        ids.push(tools::create_habit(&storage, &ctx, params).unwrap().habit_id);
    }
    tools::delete_habit(
        &storage,
        &ctx,
        tools::DeleteHabitParams {
            habit_id: ids[0].clone(),
        },
    )
    .unwrap();

    let visible = tools::list_habits(&storage, &ctx, ListHabitsParams::default()).unwrap();
    assert_eq!(visible.total, 1);
    assert_eq!(visible.habits[0].name, "Read");

    let all = tools::list_habits(
        &storage,
        &ctx,
        ListHabitsParams {
            include_deleted: Some(true),
        },
    )
    .unwrap();
    assert_eq!(all.total, 2);

    let other_user = ToolContext::new(UserId::new("bob"), ctx.calendar.clone());
    let theirs = tools::list_habits(&storage, &other_user, ListHabitsParams::default()).unwrap();
    assert_eq!(theirs.total, 0);
}
