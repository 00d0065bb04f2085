//! Habit entity and related functionality
//!
//! This module defines the Habit struct that represents something a user
//! wants to do regularly, the validated field set used to create one, and the
//! partial change set used to edit one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Calendar, DomainError, Frequency, HabitColor, HabitId, StreakTracker, UserId};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const DEFAULT_ICON: &str = "check_circle";
pub const DEFAULT_TARGET_PER_WEEK: u8 = 7;

/// User-editable fields of a habit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDetails {
    pub name: String,
    pub description: String,
    pub color: HabitColor,
    pub icon: String,
    pub frequency: Frequency,
    pub target_per_week: u8,
}

impl HabitDetails {
    /// Details with every optional field at its default
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            color: HabitColor::default(),
            icon: DEFAULT_ICON.to_string(),
            frequency: Frequency::default(),
            target_per_week: DEFAULT_TARGET_PER_WEEK,
        }
    }

    /// Trim text fields and check every rule
    pub fn normalized(mut self) -> Result<Self, DomainError> {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.icon = self.icon.trim().to_string();
        if self.icon.is_empty() {
            self.icon = DEFAULT_ICON.to_string();
        }

        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_target_per_week(self.target_per_week)?;
        Ok(self)
    }
}

/// Partial update; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<HabitColor>,
    pub icon: Option<String>,
    pub frequency: Option<Frequency>,
    pub target_per_week: Option<u8>,
}

impl HabitChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A habit represents something the user wants to do regularly
///
/// Each habit has display metadata plus a [`StreakTracker`] holding its
/// completions and streak statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Owning user
    pub user_id: UserId,
    /// Display name (e.g., "Morning Run", "Read 10 Pages")
    pub name: String,
    pub description: String,
    pub color: HabitColor,
    pub icon: String,
    pub frequency: Frequency,
    /// How many days per week the user aims for (1-7)
    pub target_per_week: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag; deleted habits keep their history
    pub is_deleted: bool,
    #[serde(flatten)]
    pub streak: StreakTracker,
}

impl Habit {
    /// Create a new habit with validation
    pub fn new(user_id: UserId, details: HabitDetails, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let details = details.normalized()?;
        Ok(Self::from_existing(
            HabitId::new(),
            user_id,
            details,
            now,
            now,
            false,
            StreakTracker::new(),
        ))
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated.
    pub fn from_existing(
        id: HabitId,
        user_id: UserId,
        details: HabitDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        is_deleted: bool,
        streak: StreakTracker,
    ) -> Self {
        Self {
            id,
            user_id,
            name: details.name,
            description: details.description,
            color: details.color,
            icon: details.icon,
            frequency: details.frequency,
            target_per_week: details.target_per_week,
            created_at,
            updated_at,
            is_deleted,
            streak,
        }
    }

    pub fn details(&self) -> HabitDetails {
        HabitDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            color: self.color,
            icon: self.icon.clone(),
            frequency: self.frequency,
            target_per_week: self.target_per_week,
        }
    }

    /// Apply a partial update with validation
    ///
    /// Nothing is changed if any new value is invalid.
    pub fn update(&mut self, changes: HabitChanges, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut details = self.details();
        if let Some(name) = changes.name {
            details.name = name;
        }
        if let Some(description) = changes.description {
            details.description = description;
        }
        if let Some(color) = changes.color {
            details.color = color;
        }
        if let Some(icon) = changes.icon {
            details.icon = icon;
        }
        if let Some(frequency) = changes.frequency {
            details.frequency = frequency;
        }
        if let Some(target) = changes.target_per_week {
            details.target_per_week = target;
        }

        let details = details.normalized()?;
        self.name = details.name;
        self.description = details.description;
        self.color = details.color;
        self.icon = details.icon;
        self.frequency = details.frequency;
        self.target_per_week = details.target_per_week;
        self.updated_at = now;
        Ok(())
    }

    /// Record a completion; see [`StreakTracker::mark_complete`]
    pub fn mark_complete(&mut self, at: DateTime<Utc>, calendar: &Calendar) -> bool {
        let changed = self.streak.mark_complete(at, calendar);
        if changed {
            self.updated_at = calendar.now();
        }
        changed
    }

    /// Remove a completion; see [`StreakTracker::unmark_complete`]
    pub fn unmark_complete(&mut self, at: DateTime<Utc>, calendar: &Calendar) -> bool {
        let changed = self.streak.unmark_complete(at, calendar);
        if changed {
            self.updated_at = calendar.now();
        }
        changed
    }

    pub fn live_streak(&self, today: NaiveDate) -> u32 {
        self.streak.live_streak(today)
    }
}

// Validation helper functions

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::InvalidHabitName(
            "Habit name cannot be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::InvalidHabitName(format!(
            "Habit name cannot be longer than {} characters",
            MAX_NAME_LEN
        )));
    }

    Ok(())
}

fn validate_description(description: &str) -> Result<(), DomainError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::Validation {
            message: format!(
                "Description cannot be longer than {} characters",
                MAX_DESCRIPTION_LEN
            ),
        });
    }
    Ok(())
}

fn validate_target_per_week(target: u8) -> Result<(), DomainError> {
    if !(1..=7).contains(&target) {
        return Err(DomainError::InvalidValue {
            message: format!("Target per week must be between 1 and 7, got {}", target),
        });
    }
    Ok(())
}
