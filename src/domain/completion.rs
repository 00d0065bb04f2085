//! Completion records for a habit
//!
//! A `Completion` is one day on which a habit was done, together with the
//! instant it was recorded at. A `CompletionSet` holds at most one completion
//! per calendar day and iterates in day order.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A record of completing a habit on a specific day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Which calendar day this completion counts for
    pub day: NaiveDate,
    /// When it was recorded (kept for time-of-day analytics)
    pub recorded_at: DateTime<Utc>,
}

impl Completion {
    pub fn new(day: NaiveDate, recorded_at: DateTime<Utc>) -> Self {
        Self { day, recorded_at }
    }
}

/// Day-keyed set of completions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Completion>", into = "Vec<Completion>")]
pub struct CompletionSet {
    entries: BTreeMap<NaiveDate, DateTime<Utc>>,
}

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.entries.contains_key(&day)
    }

    /// Insert a completion; returns false if its day is already present
    pub fn insert(&mut self, completion: Completion) -> bool {
        if self.entries.contains_key(&completion.day) {
            return false;
        }
        self.entries.insert(completion.day, completion.recorded_at);
        true
    }

    pub fn remove(&mut self, day: NaiveDate) -> Option<Completion> {
        self.entries
            .remove(&day)
            .map(|recorded_at| Completion::new(day, recorded_at))
    }

    /// Most recent completed day
    pub fn latest_day(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    /// Completions in ascending day order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Completion> + '_ {
        self.entries
            .iter()
            .map(|(day, recorded_at)| Completion::new(*day, *recorded_at))
    }

    pub fn days(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    /// Completions whose day lies within `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = Completion> + '_ {
        // BTreeMap::range panics on an inverted range
        let range = (start <= end).then(|| self.entries.range(start..=end));
        range
            .into_iter()
            .flatten()
            .map(|(day, recorded_at)| Completion::new(*day, *recorded_at))
    }

    /// Number of completed days within `[start, end]`
    pub fn count_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.between(start, end).count()
    }

    /// Length of the contiguous run of days ending at `day` (0 if absent)
    pub fn run_ending_at(&self, day: NaiveDate) -> u32 {
        let mut run = 0;
        let mut expected = day;
        for completed in self.entries.range(..=day).rev().map(|(d, _)| *d) {
            if completed != expected {
                break;
            }
            run += 1;
            expected = completed - Duration::days(1);
        }
        run
    }

    /// Length of the contiguous run of days that includes `day` (0 if absent)
    pub fn run_containing(&self, day: NaiveDate) -> u32 {
        if !self.contains(day) {
            return 0;
        }
        let mut forward = 0;
        let mut expected = day + Duration::days(1);
        for completed in self.entries.range(expected..).map(|(d, _)| *d) {
            if completed != expected {
                break;
            }
            forward += 1;
            expected = completed + Duration::days(1);
        }
        self.run_ending_at(day) + forward
    }
}

impl From<Vec<Completion>> for CompletionSet {
    fn from(completions: Vec<Completion>) -> Self {
        completions.into_iter().collect()
    }
}

impl From<CompletionSet> for Vec<Completion> {
    fn from(set: CompletionSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Completion> for CompletionSet {
    /// Later duplicates of a day are ignored
    fn from_iter<I: IntoIterator<Item = Completion>>(iter: I) -> Self {
        let mut set = Self::new();
        for completion in iter {
            set.insert(completion);
        }
        set
    }
}
