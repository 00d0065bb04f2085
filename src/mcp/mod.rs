//! MCP protocol implementation
//!
//! This module handles the Model Context Protocol communication,
//! including JSON-RPC parsing and tool routing.

pub mod protocol;
pub mod server;

pub use server::McpServer;
