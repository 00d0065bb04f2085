/// Heatmap and analytics aggregation through the public API
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use habit_streak_mcp::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

fn habit(name: &str, days: &[NaiveDate], calendar: &Calendar) -> Habit {
    let mut habit = Habit::new(UserId::new("alice"), HabitDetails::named(name), noon(day(2024, 1, 1))).unwrap();
    for d in days {
        habit.mark_complete(noon(*d), calendar);
    }
    habit
}

#[test]
fn test_heatmap_two_habits() {
    let calendar = Calendar::fixed(noon(day(2024, 6, 2)));
    let a = habit("A", &[day(2024, 6, 1), day(2024, 6, 2)], &calendar);
    let b = habit("B", &[day(2024, 6, 1)], &calendar);

    let view = AnalyticsEngine::new(calendar).build_heatmap(&[a.clone(), b.clone()], day(2024, 6, 1), day(2024, 6, 2));

    let first = &view.heatmap["2024-06-01"];
    assert_eq!(first.count, 2);
    assert_eq!(first.habits.len(), 2);
    assert!(first.habits.contains(&a.id));
    assert!(first.habits.contains(&b.id));

    let second = &view.heatmap["2024-06-02"];
    assert_eq!(second.count, 1);
    assert_eq!(second.habits, vec![a.id.clone()]);

    assert_eq!(view.stats.total_habits, 2);
    assert_eq!(view.stats.total_completions, 3);
    assert_eq!(view.stats.today_completions, 1);
}

#[test]
fn test_heatmap_range_excludes_outside_days() {
    let calendar = Calendar::fixed(noon(day(2024, 6, 10)));
    let a = habit("A", &[day(2024, 5, 31), day(2024, 6, 5), day(2024, 6, 10)], &calendar);

    let view = AnalyticsEngine::new(calendar).build_heatmap(&[a], day(2024, 6, 1), day(2024, 6, 9));
    assert_eq!(view.heatmap.len(), 1);
    assert!(view.heatmap.contains_key("2024-06-05"));
    assert_eq!(view.stats.total_completions, 3);
}

#[test]
fn test_empty_analytics() {
    let calendar = Calendar::fixed(noon(day(2024, 6, 10)));
    let report = AnalyticsEngine::new(calendar).build_analytics(&[], 7);

    assert_eq!(report.overview.total_habits, 0);
    assert_eq!(report.overview.total_completions, 0);
    assert_eq!(report.overview.avg_completion_rate, 0);
    assert_eq!(report.overview.trend, 0);
    assert_eq!(report.daily_completions.len(), 7);
    assert!(report.daily_completions.iter().all(|d| d.count == 0));
    assert!(report.best_habits.is_empty());
}

#[test]
fn test_analytics_rates_and_ranking() {
    let calendar = Calendar::fixed(noon(day(2024, 6, 10)));
    let daily: Vec<NaiveDate> = (4..=10).map(|d| day(2024, 6, d)).collect();
    let steady = habit("Steady", &daily, &calendar);
    let sporadic = habit("Sporadic", &[day(2024, 6, 9)], &calendar);

    let report = AnalyticsEngine::new(calendar).build_analytics(&[sporadic, steady], 7);

    assert_eq!(report.overview.total_completions, 8);
    assert_eq!(report.best_habits[0].name, "Steady");
    assert_eq!(report.best_habits[0].completion_rate, 100);
    assert_eq!(report.best_habits[1].completion_rate, 14);
    assert_eq!(report.weekly_data.len(), 1);
    assert_eq!(report.weekly_data[0].completions, 8);
}
