//! Period analytics report
//!
//! Rollups over the trailing `period_days` calendar days ending today, plus
//! day-of-week and time-of-day histograms over each habit's full history.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::analytics::{round_half_up, AnalyticsEngine};
use crate::domain::{Habit, HabitColor, HabitId};

/// Default trailing window for reports
pub const DEFAULT_PERIOD_DAYS: u32 = 30;

/// How many entries of the performance ranking count as "best"
pub const BEST_HABITS_LIMIT: usize = 5;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekCount {
    /// 1-based position of the 7-day chunk within the window
    pub week: u32,
    pub completions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub completions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    pub day: &'static str,
    pub count: u32,
}

/// Completions bucketed by hour of the recorded instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeOfDay {
    /// 05:00 to 11:59
    pub morning: u32,
    /// 12:00 to 16:59
    pub afternoon: u32,
    /// 17:00 to 20:59
    pub evening: u32,
    pub night: u32,
}

impl TimeOfDay {
    fn record(&mut self, hour: u32) {
        match hour {
            5..=11 => self.morning += 1,
            12..=16 => self.afternoon += 1,
            17..=20 => self.evening += 1,
            _ => self.night += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPerformance {
    pub id: HabitId,
    pub name: String,
    pub color: HabitColor,
    pub total_completions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Percentage of window days completed, rounded
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_habits: usize,
    pub total_completions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub avg_completion_rate: u32,
    /// Percent change of the second half of the window over the first
    pub trend: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub overview: Overview,
    pub daily_completions: Vec<DailyCount>,
    pub weekly_data: Vec<WeekCount>,
    pub monthly_data: Vec<MonthCount>,
    pub day_of_week: Vec<WeekdayCount>,
    pub time_of_day: TimeOfDay,
    pub best_habits: Vec<HabitPerformance>,
    pub habit_performance: Vec<HabitPerformance>,
}

impl AnalyticsEngine {
    /// Build the report for the trailing `period_days` days ending today
    pub fn build_analytics(&self, habits: &[Habit], period_days: u32) -> AnalyticsReport {
        let calendar = self.calendar();
        let today = calendar.today();
        let window_start = today - Duration::days(i64::from(period_days)) + Duration::days(1);

        let mut daily_completions: Vec<DailyCount> = (0..i64::from(period_days))
            .map(|offset| DailyCount {
                date: window_start + Duration::days(offset),
                count: 0,
            })
            .collect();

        let mut weekday_counts = [0u32; 7];
        let mut time_of_day = TimeOfDay::default();

        for habit in habits {
            for completion in habit.streak.completions().iter() {
                if let Some(slot) = window_index(window_start, completion.day, period_days) {
                    daily_completions[slot].count += 1;
                }
                weekday_counts[completion.day.weekday().num_days_from_sunday() as usize] += 1;
                time_of_day.record(calendar.hour_of(completion.recorded_at));
            }
        }

        let weekly_data = daily_completions
            .chunks(7)
            .zip(1..)
            .map(|(chunk, week)| WeekCount {
                week,
                completions: chunk.iter().map(|d| d.count).sum(),
            })
            .collect();

        let mut monthly_data: Vec<MonthCount> = Vec::new();
        for daily in &daily_completions {
            let month = daily.date.format("%Y-%m").to_string();
            match monthly_data.last_mut() {
                Some(last) if last.month == month => last.completions += daily.count,
                _ => monthly_data.push(MonthCount {
                    month,
                    completions: daily.count,
                }),
            }
        }

        let day_of_week = WEEKDAY_LABELS
            .into_iter()
            .zip(weekday_counts)
            .map(|(day, count)| WeekdayCount { day, count })
            .collect();

        let mut habit_performance: Vec<HabitPerformance> = habits
            .iter()
            .map(|habit| {
                let in_window = habit.streak.completions().count_between(window_start, today);
                HabitPerformance {
                    id: habit.id.clone(),
                    name: habit.name.clone(),
                    color: habit.color,
                    total_completions: habit.streak.total_completions(),
                    current_streak: habit.streak.current_streak(),
                    longest_streak: habit.streak.longest_streak(),
                    completion_rate: percentage(in_window as f64, f64::from(period_days)),
                }
            })
            .collect();
        // Stable sort keeps input order among equal totals
        habit_performance.sort_by(|a, b| b.total_completions.cmp(&a.total_completions));
        let best_habits = habit_performance.iter().take(BEST_HABITS_LIMIT).cloned().collect();

        let avg_completion_rate = if habit_performance.is_empty() {
            0
        } else {
            let sum: u32 = habit_performance.iter().map(|p| p.completion_rate).sum();
            round_half_up(f64::from(sum) / habit_performance.len() as f64).max(0) as u32
        };

        let midpoint = (period_days / 2) as usize;
        let first_half: u32 = daily_completions[..midpoint].iter().map(|d| d.count).sum();
        let second_half: u32 = daily_completions[midpoint..].iter().map(|d| d.count).sum();
        let trend = if first_half > 0 {
            round_half_up(100.0 * (f64::from(second_half) - f64::from(first_half)) / f64::from(first_half))
        } else if second_half > 0 {
            100
        } else {
            0
        };

        let overview = Overview {
            total_habits: habits.len(),
            total_completions: habits.iter().map(|h| h.streak.total_completions()).sum(),
            current_streak: habits.iter().map(|h| h.streak.current_streak()).max().unwrap_or(0),
            longest_streak: habits.iter().map(|h| h.streak.longest_streak()).max().unwrap_or(0),
            avg_completion_rate,
            trend,
        };

        debug!(
            "Built {}-day analytics for {} habits (trend {}%)",
            period_days,
            habits.len(),
            trend
        );

        AnalyticsReport {
            overview,
            daily_completions,
            weekly_data,
            monthly_data,
            day_of_week,
            time_of_day,
            best_habits,
            habit_performance,
        }
    }
}

fn window_index(window_start: NaiveDate, day: NaiveDate, period_days: u32) -> Option<usize> {
    let offset = (day - window_start).num_days();
    (0..i64::from(period_days))
        .contains(&offset)
        .then_some(offset as usize)
}

/// `round(100 * part / whole)`, 0 when `whole` is 0
fn percentage(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    round_half_up(100.0 * part / whole).max(0) as u32
}
