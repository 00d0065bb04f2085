//! Streak calculation and tracking functionality
//!
//! `StreakTracker` owns one habit's completion set and keeps the derived
//! streak fields consistent with it on every insertion and removal.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Calendar, Completion, CompletionSet};

/// Completion set plus the streak statistics derived from it
///
/// The derived fields are only ever changed by [`StreakTracker::mark_complete`]
/// and [`StreakTracker::unmark_complete`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakTracker {
    completions: CompletionSet,
    /// Consecutive days ending at the most recent completion
    current_streak: u32,
    /// Best streak ever recorded; never lowered by removals
    longest_streak: u32,
    /// Most recent completed day
    last_completed: Option<NaiveDate>,
    /// Number of completed days
    total_completions: u32,
}

impl StreakTracker {
    /// Create an empty tracker for a new habit
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker from persisted state (used when loading from database)
    pub fn from_existing(
        completions: CompletionSet,
        current_streak: u32,
        longest_streak: u32,
        last_completed: Option<NaiveDate>,
        total_completions: u32,
    ) -> Self {
        Self {
            completions,
            current_streak,
            longest_streak,
            last_completed,
            total_completions,
        }
    }

    pub fn completions(&self) -> &CompletionSet {
        &self.completions
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.last_completed
    }

    pub fn total_completions(&self) -> u32 {
        self.total_completions
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completions.contains(day)
    }

    /// Record a completion at `at`
    ///
    /// Returns `false` without touching any field when the day is already
    /// completed.
    pub fn mark_complete(&mut self, at: DateTime<Utc>, calendar: &Calendar) -> bool {
        let day = calendar.day_of(at);
        if !self.completions.insert(Completion::new(day, at)) {
            return false;
        }
        self.total_completions += 1;

        let previous = self.last_completed;
        match previous {
            Some(last) if day < last => {
                // Backfilled day: the most recent completion is unchanged, but
                // the new day may have joined runs on either side of it.
                self.current_streak = self.completions.run_ending_at(last);
                self.longest_streak = self
                    .longest_streak
                    .max(self.completions.run_containing(day));
            }
            _ => {
                self.last_completed = Some(day);
                let yesterday = day - Duration::days(1);
                if previous == Some(yesterday) {
                    self.current_streak += 1;
                } else if previous != Some(day) {
                    self.current_streak = 1;
                }
            }
        }

        self.longest_streak = self.longest_streak.max(self.current_streak);
        true
    }

    /// Remove the completion for the day `at` falls on
    ///
    /// Returns `false` without touching any field when the day is not
    /// completed. The current streak is rebuilt from the remaining days.
    pub fn unmark_complete(&mut self, at: DateTime<Utc>, calendar: &Calendar) -> bool {
        let day = calendar.day_of(at);
        if self.completions.remove(day).is_none() {
            return false;
        }
        self.total_completions = self.total_completions.saturating_sub(1);

        match self.completions.latest_day() {
            None => {
                self.current_streak = 0;
                self.last_completed = None;
            }
            Some(latest) => {
                self.last_completed = Some(latest);
                self.current_streak = if Self::within_grace(latest, calendar.today()) {
                    self.completions.run_ending_at(latest)
                } else {
                    0
                };
            }
        }

        true
    }

    /// Streak as seen on `today`: zero once the last completion is older than yesterday
    pub fn live_streak(&self, today: NaiveDate) -> u32 {
        if self.is_on_track(today) {
            self.current_streak
        } else {
            0
        }
    }

    /// Whether the habit was completed today or yesterday
    pub fn is_on_track(&self, today: NaiveDate) -> bool {
        self.last_completed
            .map(|last| Self::within_grace(last, today))
            .unwrap_or(false)
    }

    /// Get a motivational message based on the streak as of `today`
    pub fn motivational_message(&self, today: NaiveDate) -> String {
        let streak = self.live_streak(today);
        match streak {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", streak),
            7..=13 => format!("Excellent! {} days strong. You're in the groove now!", streak),
            14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", streak),
            30..=99 => format!("Incredible! {} days of consistency. You're a habit master!", streak),
            _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", streak),
        }
    }

    fn within_grace(last: NaiveDate, today: NaiveDate) -> bool {
        last == today || last == today - Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 09:30 UTC on the given day
    fn at(d: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&d.and_hms_opt(9, 30, 0).unwrap())
    }

    fn calendar_on(today: NaiveDate) -> Calendar {
        Calendar::fixed(Utc.from_utc_datetime(&today.and_hms_opt(18, 0, 0).unwrap()))
    }

    #[test]
    fn test_new_tracker_is_empty() {
        let tracker = StreakTracker::new();
        assert_eq!(tracker.current_streak(), 0);
        assert_eq!(tracker.longest_streak(), 0);
        assert_eq!(tracker.last_completed(), None);
        assert_eq!(tracker.total_completions(), 0);
        assert!(tracker.completions().is_empty());
    }

    #[test]
    fn test_consecutive_days_build_streak() {
        let start = day(2024, 3, 1);
        let calendar = calendar_on(start + Duration::days(30));
        let mut tracker = StreakTracker::new();

        for offset in 0..5 {
            assert!(tracker.mark_complete(at(start + Duration::days(offset)), &calendar));
        }

        assert_eq!(tracker.current_streak(), 5);
        assert_eq!(tracker.longest_streak(), 5);
        assert_eq!(tracker.total_completions(), 5);
        assert_eq!(tracker.last_completed(), Some(day(2024, 3, 5)));
    }

    #[test]
    fn test_mark_same_day_twice_is_noop() {
        let today = day(2024, 3, 10);
        let calendar = calendar_on(today);
        let mut tracker = StreakTracker::new();

        assert!(tracker.mark_complete(at(today), &calendar));
        let before = tracker.clone();

        let later_same_day = Utc.from_utc_datetime(&today.and_hms_opt(22, 0, 0).unwrap());
        assert!(!tracker.mark_complete(later_same_day, &calendar));
        assert_eq!(tracker, before);
    }

    #[test]
    fn test_gap_resets_current_streak() {
        let d = day(2024, 5, 1);
        let calendar = calendar_on(d + Duration::days(4));
        let mut tracker = StreakTracker::new();

        for offset in [0, 1, 2, 4] {
            tracker.mark_complete(at(d + Duration::days(offset)), &calendar);
        }

        assert_eq!(tracker.current_streak(), 1);
        assert_eq!(tracker.longest_streak(), 3);
        assert_eq!(tracker.total_completions(), 4);
    }

    #[test]
    fn test_gap_any_insertion_order() {
        let d = day(2024, 5, 1);
        let calendar = calendar_on(d + Duration::days(5));
        let orders: [[i64; 4]; 4] = [[4, 2, 1, 0], [0, 4, 1, 2], [2, 0, 4, 1], [1, 2, 0, 4]];

        for order in orders {
            let mut tracker = StreakTracker::new();
            for offset in order {
                tracker.mark_complete(at(d + Duration::days(offset)), &calendar);
                assert!(tracker.longest_streak() >= tracker.current_streak());
            }
            assert_eq!(tracker.current_streak(), 1, "order {:?}", order);
            assert_eq!(tracker.longest_streak(), 3, "order {:?}", order);
            assert_eq!(tracker.last_completed(), Some(d + Duration::days(4)));
            assert_eq!(tracker.total_completions(), 4);
        }
    }

    #[test]
    fn test_backfill_bridges_gap() {
        let d = day(2024, 5, 1);
        let calendar = calendar_on(d + Duration::days(4));
        let mut tracker = StreakTracker::new();

        for offset in [0, 1, 3, 4] {
            tracker.mark_complete(at(d + Duration::days(offset)), &calendar);
        }
        assert_eq!(tracker.current_streak(), 2);

        tracker.mark_complete(at(d + Duration::days(2)), &calendar);
        assert_eq!(tracker.current_streak(), 5);
        assert_eq!(tracker.longest_streak(), 5);
        assert_eq!(tracker.last_completed(), Some(d + Duration::days(4)));
    }

    #[test]
    fn test_unmark_missing_day_is_noop() {
        let today = day(2024, 3, 10);
        let calendar = calendar_on(today);
        let mut tracker = StreakTracker::new();
        tracker.mark_complete(at(today), &calendar);
        let before = tracker.clone();

        assert!(!tracker.unmark_complete(at(today - Duration::days(3)), &calendar));
        assert_eq!(tracker, before);
    }

    #[test]
    fn test_unmark_only_day_keeps_longest() {
        let today = day(2024, 3, 10);
        let calendar = calendar_on(today);
        let mut tracker = StreakTracker::new();
        tracker.mark_complete(at(today), &calendar);

        assert!(tracker.unmark_complete(at(today), &calendar));
        assert_eq!(tracker.current_streak(), 0);
        assert_eq!(tracker.total_completions(), 0);
        assert_eq!(tracker.last_completed(), None);
        assert_eq!(tracker.longest_streak(), 1);
    }

    #[test]
    fn test_unmark_middle_of_old_run() {
        // 2024-01-01..03 are long past: the remaining streak is considered broken.
        let calendar = calendar_on(day(2024, 2, 1));
        let mut tracker = StreakTracker::new();
        for d in 1..=3 {
            tracker.mark_complete(at(day(2024, 1, d)), &calendar);
        }
        assert_eq!(tracker.longest_streak(), 3);

        assert!(tracker.unmark_complete(at(day(2024, 1, 2)), &calendar));
        assert_eq!(tracker.current_streak(), 0);
        assert_eq!(tracker.total_completions(), 2);
        assert_eq!(tracker.longest_streak(), 3);
        assert_eq!(tracker.last_completed(), Some(day(2024, 1, 3)));
    }

    #[test]
    fn test_unmark_middle_of_recent_run() {
        // Same scenario but 01-03 is today: walk back from 01-03 finds a gap at 01-02.
        let calendar = calendar_on(day(2024, 1, 3));
        let mut tracker = StreakTracker::new();
        for d in 1..=3 {
            tracker.mark_complete(at(day(2024, 1, d)), &calendar);
        }

        tracker.unmark_complete(at(day(2024, 1, 2)), &calendar);
        assert_eq!(tracker.current_streak(), 1);
        assert_eq!(tracker.total_completions(), 2);
        assert_eq!(tracker.longest_streak(), 3);
    }

    #[test]
    fn test_unmark_latest_recomputes_by_walking_back() {
        // Removing D+2 from {D, D+1, D+2} where D+1 is yesterday.
        let d = day(2024, 7, 8);
        let calendar = calendar_on(d + Duration::days(2));
        let mut tracker = StreakTracker::new();
        for offset in 0..3 {
            tracker.mark_complete(at(d + Duration::days(offset)), &calendar);
        }

        tracker.unmark_complete(at(d + Duration::days(2)), &calendar);
        assert_eq!(tracker.last_completed(), Some(d + Duration::days(1)));
        assert_eq!(tracker.current_streak(), 2);
        assert_eq!(tracker.longest_streak(), 3);
    }

    #[test]
    fn test_live_streak_grace_window() {
        let d = day(2024, 9, 1);
        let calendar = calendar_on(d);
        let mut tracker = StreakTracker::new();
        tracker.mark_complete(at(d - Duration::days(1)), &calendar);
        tracker.mark_complete(at(d), &calendar);

        assert_eq!(tracker.live_streak(d), 2);
        assert_eq!(tracker.live_streak(d + Duration::days(1)), 2);
        assert_eq!(tracker.live_streak(d + Duration::days(2)), 0);
        // The stored value only changes on mark/unmark
        assert_eq!(tracker.current_streak(), 2);
    }

    #[test]
    fn test_normalizes_with_calendar_boundary() {
        use crate::domain::DayBoundary;
        use std::sync::Arc;

        let now = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();
        let calendar = Calendar::new(
            DayBoundary::parse("+03:00").unwrap(),
            Arc::new(crate::domain::FixedClock(now)),
        );
        let mut tracker = StreakTracker::new();

        // 22:30 UTC on April 1st is already April 2nd at +03:00
        let late = Utc.with_ymd_and_hms(2024, 4, 1, 22, 30, 0).unwrap();
        tracker.mark_complete(late, &calendar);
        assert_eq!(tracker.last_completed(), Some(day(2024, 4, 2)));
        assert!(!tracker.mark_complete(now, &calendar));
    }

    #[test]
    fn test_motivational_messages() {
        let today = day(2024, 1, 10);
        let calendar = calendar_on(today);
        let mut tracker = StreakTracker::new();
        assert!(tracker.motivational_message(today).contains("Ready to start"));

        tracker.mark_complete(at(today), &calendar);
        assert!(tracker.motivational_message(today).contains("Great start"));
    }

    #[test]
    fn test_message_for_stale_streak() {
        let calendar = calendar_on(day(2024, 1, 20));
        let mut tracker = StreakTracker::new();
        for d in 1..=8 {
            tracker.mark_complete(at(day(2024, 1, d)), &calendar);
        }
        assert_eq!(tracker.current_streak(), 8);

        assert!(tracker.motivational_message(day(2024, 1, 9)).contains("8 days strong"));
        assert!(tracker.motivational_message(day(2024, 1, 20)).contains("Ready to start"));
    }
}
