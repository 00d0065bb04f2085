//! Analytics engine for heatmaps and completion reports
//!
//! Builds read-only views over a user's habits. Streak figures are taken from
//! the values each habit's tracker already maintains; nothing here mutates a
//! habit or recomputes a streak.

mod heatmap;
mod report;

pub use heatmap::*;
pub use report::*;

use crate::domain::Calendar;

/// Number of weeks a heatmap covers when no range is requested
pub const DEFAULT_HEATMAP_WEEKS: i64 = 52;

/// Analytics engine for processing habit data
///
/// Holds the calendar that decides what "today" is and which hour a
/// completion was recorded in.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    calendar: Calendar,
}

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }
}

/// Round half up, so 2.5 becomes 3 and -2.5 becomes -2
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
