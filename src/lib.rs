//! Habit streak MCP server
//!
//! Tracks daily habits in SQLite, keeps their streaks up to date as days are
//! marked and unmarked, and aggregates completions into a heatmap and period
//! analytics. Everything is exposed as MCP tools over JSON-RPC on stdio.

use thiserror::Error;
use tracing::info;

pub mod analytics;
pub mod config;
pub mod domain;
pub mod mcp;
pub mod metrics;
pub mod storage;
pub mod tools;

pub use analytics::{AnalyticsEngine, AnalyticsReport, HeatmapView};
pub use config::ServerConfig;
pub use domain::*;
pub use mcp::McpServer;
pub use storage::{HabitStorage, SqliteStorage, StorageError};
pub use tools::{ToolContext, ToolError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The habit store plus the user and calendar requests are served for
pub struct HabitStreakServer {
    storage: SqliteStorage,
    ctx: ToolContext,
}

impl HabitStreakServer {
    /// Open (and migrate) the database named in `config`
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        info!(
            "Initializing habit streak server with database {:?} for user '{}' (days start at {})",
            config.database_path, config.user_id, config.day_boundary
        );

        let storage = SqliteStorage::new(config.database_path)?;
        let ctx = ToolContext::new(config.user_id, Calendar::system(config.day_boundary));

        Ok(Self { storage, ctx })
    }

    /// Serve JSON-RPC requests on stdin/stdout until stdin closes
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.count_habits()?;
        info!("Server started, {} habits on record", habits);

        let mut mcp_server = McpServer::new(self.storage, self.ctx);
        mcp_server.run().await
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }
}
