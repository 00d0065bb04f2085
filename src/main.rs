//! Entry point for the habit streak MCP server
//!
//! Sets up logging, reads the configuration from the command line and
//! environment, and serves JSON-RPC requests over stdin/stdout.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_streak_mcp::config::{resolve_database_path, ServerConfig, DEFAULT_USER};
use habit_streak_mcp::{DayBoundary, HabitStreakServer, UserId};

/// Command line arguments for the habit streak MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "HABIT_STREAK_DATABASE")]
    database: Option<PathBuf>,

    /// User whose habits are served
    #[arg(long, env = "HABIT_STREAK_USER", default_value = DEFAULT_USER)]
    user: String,

    /// UTC offset at which calendar days begin, e.g. +02:00 or -0500
    #[arg(long, env = "HABIT_STREAK_UTC_OFFSET", default_value = "+00:00", allow_hyphen_values = true)]
    utc_offset: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("habit_streak_mcp={}", log_level)));

    // stdout carries JSON-RPC only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting habit streak MCP server");

    let database_path = resolve_database_path(args.database)?;
    info!("Using database at: {}", database_path.display());

    let config = ServerConfig::new(database_path)
        .with_user(UserId::new(args.user.trim()))
        .with_day_boundary(DayBoundary::parse(&args.utc_offset)?);

    let server = HabitStreakServer::new(config)?;
    server.run().await?;

    info!("Habit streak MCP server shutdown complete");
    Ok(())
}
