//! Contribution-graph style heatmap

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::analytics::AnalyticsEngine;
use crate::domain::{Habit, HabitColor, HabitId};

/// Completions recorded on one calendar day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeatmapBucket {
    pub count: u32,
    /// Habits that contributed, each listed once
    pub habits: Vec<HabitId>,
}

/// Per-habit figures shown next to the heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStat {
    pub name: String,
    pub color: HabitColor,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub count: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapStats {
    pub total_habits: usize,
    pub total_completions: u32,
    pub longest_streak: u32,
    pub current_streak: u32,
    pub today_completions: u32,
    /// Trailing 7 days, oldest first
    pub weekly_stats: Vec<DayStat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    /// `YYYY-MM-DD` → bucket, limited to the requested range
    pub heatmap: BTreeMap<String, HeatmapBucket>,
    pub habit_stats: BTreeMap<HabitId, HabitStat>,
    pub stats: HeatmapStats,
}

impl AnalyticsEngine {
    /// Build the heatmap for `[start, end]` plus summary statistics
    ///
    /// Buckets are returned only for days inside the range, but `stats` is
    /// computed over every completion regardless of the range.
    pub fn build_heatmap(&self, habits: &[Habit], start: NaiveDate, end: NaiveDate) -> HeatmapView {
        let mut buckets: BTreeMap<NaiveDate, HeatmapBucket> = BTreeMap::new();
        let mut habit_stats = BTreeMap::new();

        for habit in habits {
            habit_stats.insert(
                habit.id.clone(),
                HabitStat {
                    name: habit.name.clone(),
                    color: habit.color,
                    current_streak: habit.streak.current_streak(),
                    longest_streak: habit.streak.longest_streak(),
                    total_completions: habit.streak.total_completions(),
                },
            );

            for day in habit.streak.completions().days() {
                let bucket = buckets.entry(day).or_default();
                bucket.count += 1;
                if !bucket.habits.contains(&habit.id) {
                    bucket.habits.push(habit.id.clone());
                }
            }
        }

        let today = self.calendar().today();
        let count_on = |day: NaiveDate| buckets.get(&day).map_or(0, |bucket| bucket.count);

        let weekly_stats = (0..7)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let count = count_on(date);
                DayStat {
                    date,
                    count,
                    completed: count > 0,
                }
            })
            .collect();

        let stats = HeatmapStats {
            total_habits: habits.len(),
            total_completions: habits.iter().map(|h| h.streak.total_completions()).sum(),
            longest_streak: habits.iter().map(|h| h.streak.longest_streak()).max().unwrap_or(0),
            current_streak: habits.iter().map(|h| h.streak.current_streak()).max().unwrap_or(0),
            today_completions: count_on(today),
            weekly_stats,
        };

        let heatmap: BTreeMap<String, HeatmapBucket> = if start <= end {
            buckets
                .range(start..=end)
                .map(|(day, bucket)| (day.format("%Y-%m-%d").to_string(), bucket.clone()))
                .collect()
        } else {
            BTreeMap::new()
        };

        debug!(
            "Built heatmap for {} habits from {} to {}: {} active days",
            habits.len(),
            start,
            end,
            heatmap.len()
        );

        HeatmapView {
            heatmap,
            habit_stats,
            stats,
        }
    }
}
