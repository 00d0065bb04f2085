/// Streak bookkeeping through the public domain API
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use habit_streak_mcp::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

#[test]
fn test_consecutive_days_in_order() {
    let calendar = Calendar::fixed(noon(day(2024, 3, 10)));
    let mut tracker = StreakTracker::new();

    for offset in 0..10 {
        assert!(tracker.mark_complete(noon(day(2024, 3, 1) + Duration::days(offset)), &calendar));
    }

    assert_eq!(tracker.current_streak(), 10);
    assert_eq!(tracker.longest_streak(), 10);
    assert_eq!(tracker.total_completions(), 10);
    assert_eq!(tracker.last_completed(), Some(day(2024, 3, 10)));
}

#[test]
fn test_distinct_days_any_order() {
    let calendar = Calendar::fixed(noon(day(2024, 3, 31)));
    let mut tracker = StreakTracker::new();
    let days = [5, 1, 2, 9, 3, 20, 4, 21, 10];

    for (i, d) in days.iter().enumerate() {
        tracker.mark_complete(noon(day(2024, 3, *d)), &calendar);
        assert_eq!(tracker.total_completions() as usize, i + 1);
        assert!(tracker.longest_streak() >= tracker.current_streak());
    }

    assert_eq!(tracker.longest_streak(), 5);
    assert_eq!(tracker.last_completed(), Some(day(2024, 3, 21)));
}

#[test]
fn test_same_day_twice_is_noop() {
    let calendar = Calendar::fixed(noon(day(2024, 3, 10)));
    let mut tracker = StreakTracker::new();
    let morning = Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap();

    assert!(tracker.mark_complete(morning, &calendar));
    let before = tracker.clone();
    assert!(!tracker.mark_complete(evening, &calendar));
    assert_eq!(tracker, before);
}

#[test]
fn test_unmark_middle_day() {
    let calendar = Calendar::fixed(noon(day(2024, 1, 4)));
    let mut tracker = StreakTracker::new();
    for d in 1..=3 {
        tracker.mark_complete(noon(day(2024, 1, d)), &calendar);
    }
    assert_eq!(tracker.current_streak(), 3);

    assert!(tracker.unmark_complete(noon(day(2024, 1, 2)), &calendar));
    assert_eq!(tracker.current_streak(), 1);
    assert_eq!(tracker.total_completions(), 2);
    assert_eq!(tracker.longest_streak(), 3);

    assert!(!tracker.unmark_complete(noon(day(2024, 1, 2)), &calendar));
}

#[test]
fn test_unmark_outside_grace_window() {
    let calendar = Calendar::fixed(noon(day(2024, 2, 1)));
    let mut tracker = StreakTracker::new();
    for d in 1..=3 {
        tracker.mark_complete(noon(day(2024, 1, d)), &calendar);
    }

    tracker.unmark_complete(noon(day(2024, 1, 2)), &calendar);
    assert_eq!(tracker.current_streak(), 0);
    assert_eq!(tracker.last_completed(), Some(day(2024, 1, 3)));
}

#[test]
fn test_unmark_last_completion() {
    let calendar = Calendar::fixed(noon(day(2024, 1, 1)));
    let mut tracker = StreakTracker::new();
    tracker.mark_complete(noon(day(2024, 1, 1)), &calendar);

    assert!(tracker.unmark_complete(noon(day(2024, 1, 1)), &calendar));
    assert_eq!(tracker.current_streak(), 0);
    assert_eq!(tracker.total_completions(), 0);
    assert_eq!(tracker.last_completed(), None);
    assert_eq!(tracker.longest_streak(), 1);
}

#[test]
fn test_day_boundary_offset() {
    // 03:00 UTC on the 2nd is still the 1st five hours west of UTC
    let boundary = DayBoundary::parse("-05:00").unwrap();
    let instant = Utc.with_ymd_and_hms(2024, 5, 2, 3, 0, 0).unwrap();
    let calendar = Calendar::new(boundary, std::sync::Arc::new(FixedClock(instant)));

    let mut tracker = StreakTracker::new();
    tracker.mark_complete(instant, &calendar);
    assert_eq!(tracker.last_completed(), Some(day(2024, 5, 1)));
    assert_eq!(calendar.today(), day(2024, 5, 1));
}

#[test]
fn test_live_streak_expires() {
    let calendar = Calendar::fixed(noon(day(2024, 1, 3)));
    let mut tracker = StreakTracker::new();
    for d in 1..=3 {
        tracker.mark_complete(noon(day(2024, 1, d)), &calendar);
    }

    assert_eq!(tracker.live_streak(day(2024, 1, 3)), 3);
    assert_eq!(tracker.live_streak(day(2024, 1, 4)), 3);
    assert_eq!(tracker.live_streak(day(2024, 1, 5)), 0);
    assert_eq!(tracker.current_streak(), 3);
}
