//! Core types and enums used throughout the domain layer
//!
//! This module defines the identifier newtypes and the closed enumerations
//! (colour palette, frequency) that Habit and the analytics views share.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a user ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the user who owns a habit
///
/// Users are managed outside this server, so the reference is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The palette a habit can be displayed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HabitColor {
    #[default]
    #[serde(rename = "#13ec6a")]
    Green,
    #[serde(rename = "#3b82f6")]
    Blue,
    #[serde(rename = "#f59e0b")]
    Amber,
    #[serde(rename = "#ef4444")]
    Red,
    #[serde(rename = "#8b5cf6")]
    Violet,
    #[serde(rename = "#ec4899")]
    Pink,
    #[serde(rename = "#14b8a6")]
    Teal,
    #[serde(rename = "#f97316")]
    Orange,
}

impl HabitColor {
    pub const ALL: [HabitColor; 8] = [
        HabitColor::Green,
        HabitColor::Blue,
        HabitColor::Amber,
        HabitColor::Red,
        HabitColor::Violet,
        HabitColor::Pink,
        HabitColor::Teal,
        HabitColor::Orange,
    ];

    /// Hex code used for storage and display
    pub fn as_hex(&self) -> &'static str {
        match self {
            HabitColor::Green => "#13ec6a",
            HabitColor::Blue => "#3b82f6",
            HabitColor::Amber => "#f59e0b",
            HabitColor::Red => "#ef4444",
            HabitColor::Violet => "#8b5cf6",
            HabitColor::Pink => "#ec4899",
            HabitColor::Teal => "#14b8a6",
            HabitColor::Orange => "#f97316",
        }
    }

    /// Parse a hex code (case-insensitive, leading `#` optional)
    pub fn from_hex(value: &str) -> Result<Self, DomainError> {
        let normalized = value.trim().trim_start_matches('#').to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|color| color.as_hex()[1..] == normalized)
            .ok_or_else(|| {
                DomainError::InvalidColor(format!(
                    "'{}' is not in the palette ({})",
                    value,
                    Self::ALL.iter().map(|c| c.as_hex()).collect::<Vec<_>>().join(", ")
                ))
            })
    }
}

/// How often a habit should be performed
///
/// Streak accounting is always day-based; the frequency is display metadata
/// paired with `target_per_week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            _ => Err(DomainError::InvalidFrequency(format!(
                "Invalid frequency '{}'. Valid options: daily, weekly, custom",
                value
            ))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
