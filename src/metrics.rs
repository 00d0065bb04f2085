//! Request metrics for the `server_health` tool
//!
//! Keeps the most recent tool-call timings and failures in fixed-capacity
//! ring buffers. Older records are evicted as new ones arrive, so memory use
//! is bounded no matter how long the server runs.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum number of timings retained
pub const MAX_TIMINGS: usize = 1000;

/// Maximum number of failures retained
pub const MAX_FAILURES: usize = 100;

/// The average response time is computed over this many most recent calls
const AVERAGE_WINDOW: usize = 100;

/// Number of failures included verbatim in a snapshot
const RECENT_FAILURES: usize = 10;

/// FIFO buffer that drops its oldest element when full
#[derive(Debug)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTiming {
    pub tool: String,
    pub duration_ms: f64,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestFailure {
    pub tool: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStats {
    pub count: usize,
    pub avg_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub uptime_seconds: i64,
    pub started_at: DateTime<Utc>,
    /// Calls currently held in the timing buffer
    pub recorded_requests: usize,
    pub avg_response_ms: f64,
    pub tool_stats: BTreeMap<String, ToolStats>,
    pub errors_last_24h: usize,
    /// Newest last
    pub recent_errors: Vec<RequestFailure>,
}

/// Shared, thread-safe request metrics
#[derive(Debug)]
pub struct RequestMetrics {
    started_at: DateTime<Utc>,
    timings: Mutex<RingBuffer<RequestTiming>>,
    failures: Mutex<RingBuffer<RequestFailure>>,
}

impl RequestMetrics {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self::with_capacity(started_at, MAX_TIMINGS, MAX_FAILURES)
    }

    pub fn with_capacity(started_at: DateTime<Utc>, timings: usize, failures: usize) -> Self {
        Self {
            started_at,
            timings: Mutex::new(RingBuffer::new(timings)),
            failures: Mutex::new(RingBuffer::new(failures)),
        }
    }

    pub fn record_success(&self, tool: &str, elapsed: Duration, at: DateTime<Utc>) {
        lock(&self.timings).push(RequestTiming {
            tool: tool.to_string(),
            duration_ms: elapsed.as_secs_f64() * 1000.0,
            at,
        });
    }

    /// Failed calls count towards timings as well
    pub fn record_failure(&self, tool: &str, elapsed: Duration, message: &str, at: DateTime<Utc>) {
        self.record_success(tool, elapsed, at);
        lock(&self.failures).push(RequestFailure {
            tool: tool.to_string(),
            message: message.to_string(),
            at,
        });
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> MetricsSnapshot {
        let timings = lock(&self.timings);

        let recent: Vec<f64> = timings
            .iter()
            .rev()
            .take(AVERAGE_WINDOW)
            .map(|t| t.duration_ms)
            .collect();
        let avg_response_ms = mean(&recent);

        let mut per_tool: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for timing in timings.iter() {
            per_tool.entry(timing.tool.clone()).or_default().push(timing.duration_ms);
        }
        let tool_stats = per_tool
            .into_iter()
            .map(|(tool, durations)| {
                let stats = ToolStats {
                    count: durations.len(),
                    avg_ms: mean(&durations),
                };
                (tool, stats)
            })
            .collect();
        let recorded_requests = timings.len();
        drop(timings);

        let failures = lock(&self.failures);
        let day_ago = now - chrono::Duration::hours(24);
        let errors_last_24h = failures.iter().filter(|f| f.at > day_ago).count();
        let skip = failures.len().saturating_sub(RECENT_FAILURES);
        let recent_errors = failures.iter().skip(skip).cloned().collect();

        MetricsSnapshot {
            uptime_seconds: (now - self.started_at).num_seconds().max(0),
            started_at: self.started_at,
            recorded_requests,
            avg_response_ms,
            tool_stats,
            errors_last_24h,
            recent_errors,
        }
    }
}

/// Ignores poisoning: every push leaves a buffer valid
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
