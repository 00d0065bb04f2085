//! Day-boundary policy and clock
//!
//! Every place that turns an instant into a calendar day goes through a
//! [`Calendar`]. The day boundary is an explicit fixed UTC offset (UTC unless
//! configured otherwise) so results never depend on the host timezone.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc};

use crate::domain::DomainError;

/// Years a caller-supplied date may fall in
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=9999;

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Where calendar days start, expressed as a fixed offset from UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    /// Days start at UTC midnight
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn from_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Parse `Z`, `UTC`, `+HH`, `+HH:MM` or `-HHMM`
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }

        let invalid = || DomainError::InvalidDate(format!("Invalid UTC offset '{}'", value));

        let (sign, rest) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };

        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if !(digits.len() == 2 || digits.len() == 4) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = if digits.len() == 4 {
            digits[2..].parse().map_err(|_| invalid())?
        } else {
            0
        };
        if minutes >= 60 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::from_offset)
            .ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day an instant falls on
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Hour of day (0-23) an instant falls on
    pub fn hour_of(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.offset).hour()
    }

    /// The instant a calendar day starts
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let local_midnight = day.and_time(NaiveTime::MIN);
        let utc = local_midnight - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc)
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset)
    }
}

/// Day boundary plus the clock that says what "today" is
#[derive(Clone)]
pub struct Calendar {
    boundary: DayBoundary,
    clock: Arc<dyn Clock>,
}

impl Calendar {
    pub fn new(boundary: DayBoundary, clock: Arc<dyn Clock>) -> Self {
        Self { boundary, clock }
    }

    /// Wall clock with the given day boundary
    pub fn system(boundary: DayBoundary) -> Self {
        Self::new(boundary, Arc::new(SystemClock))
    }

    /// UTC days, frozen at `now`
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self::new(DayBoundary::utc(), Arc::new(FixedClock(now)))
    }

    pub fn boundary(&self) -> DayBoundary {
        self.boundary
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.boundary.day_of(self.now())
    }

    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        self.boundary.day_of(at)
    }

    pub fn hour_of(&self, at: DateTime<Utc>) -> u32 {
        self.boundary.hour_of(at)
    }

    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.boundary.start_of_day(day)
    }

    /// Parse a caller-supplied timestamp
    ///
    /// Accepts RFC 3339 instants or bare `YYYY-MM-DD` dates; a bare date means
    /// the start of that day under this calendar's boundary.
    pub fn parse_instant(&self, value: &str) -> Result<DateTime<Utc>, DomainError> {
        let trimmed = value.trim();
        let at = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(day) if SUPPORTED_YEARS.contains(&day.year()) => self.start_of_day(day),
            Ok(_) => return Err(out_of_range(value)),
            Err(_) => DateTime::parse_from_rfc3339(trimmed)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    DomainError::InvalidDate(format!(
                        "Invalid date '{}'. Use YYYY-MM-DD or an RFC 3339 timestamp",
                        value
                    ))
                })?,
        };

        if !SUPPORTED_YEARS.contains(&self.day_of(at).year()) {
            return Err(out_of_range(value));
        }
        Ok(at)
    }

    /// Parse a caller-supplied calendar day (`YYYY-MM-DD` or RFC 3339)
    pub fn parse_day(&self, value: &str) -> Result<NaiveDate, DomainError> {
        self.parse_instant(value).map(|at| self.day_of(at))
    }
}

fn out_of_range(value: &str) -> DomainError {
    DomainError::InvalidDate(format!(
        "Date '{}' is outside the supported years {}-{}",
        value,
        SUPPORTED_YEARS.start(),
        SUPPORTED_YEARS.end()
    ))
}

impl fmt::Debug for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calendar")
            .field("boundary", &self.boundary)
            .field("now", &self.now())
            .finish()
    }
}
