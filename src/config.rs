//! Server configuration
//!
//! `ServerConfig` is what the binary hands to [`crate::HabitStreakServer`]:
//! where the database lives, whose habits are served, and where calendar days
//! begin.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::{DayBoundary, UserId};

/// User served when none is configured
pub const DEFAULT_USER: &str = "local";

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "habits.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_path: PathBuf,
    pub user_id: UserId,
    pub day_boundary: DayBoundary,
}

impl ServerConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            user_id: UserId::new(DEFAULT_USER),
            day_boundary: DayBoundary::utc(),
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }
}

/// Use `explicit` if given (creating its parent directory), otherwise the
/// first writable default location
pub fn resolve_database_path(explicit: Option<PathBuf>) -> io::Result<PathBuf> {
    match explicit {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Ok(path)
        }
        None => default_database_path(),
    }
}

/// Home directory, then data directory, then config directory, then the
/// working directory; a temp directory if none of them is writable
pub fn default_database_path() -> io::Result<PathBuf> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".habit_streak")),
        dirs::data_dir().map(|p| p.join("habit_streak")),
        dirs::config_dir().map(|p| p.join("habit_streak")),
        std::env::current_dir().ok().map(|p| p.join(".habit_streak")),
    ];

    for dir in candidates.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join(DATABASE_FILE));
        }
    }

    let temp_dir = std::env::temp_dir().join("habit_streak");
    std::fs::create_dir_all(&temp_dir)?;
    warn!("Using temporary directory for database: {}", temp_dir.display());
    Ok(temp_dir.join(DATABASE_FILE))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".write_test");
    if std::fs::write(&probe, b"ok").is_err() {
        return false;
    }
    let _ = std::fs::remove_file(&probe);
    true
}
