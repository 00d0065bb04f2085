//! MCP server implementation that handles JSON-RPC communication
//!
//! This module implements the actual MCP server that:
//! 1. Reads JSON-RPC requests from stdin, one per line
//! 2. Runs tool calls against the habit store
//! 3. Writes JSON-RPC responses to stdout

use std::time::Instant;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::metrics::RequestMetrics;
use crate::storage::HabitStorage;
use crate::tools::{self, ToolContext, ToolError};
use crate::ServerError;

/// MCP server bound to one habit store and one user
pub struct McpServer<S: HabitStorage> {
    storage: S,
    ctx: ToolContext,
    metrics: RequestMetrics,
    /// Whether the client has sent `initialized`
    initialized: bool,
}

impl<S: HabitStorage> McpServer<S> {
    pub fn new(storage: S, ctx: ToolContext) -> Self {
        let metrics = RequestMetrics::new(ctx.calendar.now());
        Self {
            storage,
            ctx,
            metrics,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Streak MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let call: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let started = Instant::now();
        let outcome = self.dispatch(&call.name, call.arguments);
        let elapsed = started.elapsed();

        let result = match outcome {
            Ok(text) => {
                self.metrics.record_success(&call.name, elapsed, self.ctx.calendar.now());
                debug!("Tool {} finished in {:?}", call.name, elapsed);
                ToolCallResult::success(text)
            }
            Err(e) => {
                let message = e.to_string();
                self.metrics
                    .record_failure(&call.name, elapsed, &message, self.ctx.calendar.now());
                if e.is_client_error() {
                    debug!("Tool {} rejected: {}", call.name, message);
                } else {
                    warn!("Tool {} failed: {}", call.name, message);
                }
                ToolCallResult::error(tool_error_code(&e), message)
            }
        };

        respond(id, &result)
    }

    fn dispatch(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        match name {
            "habit_create" => self.invoke(arguments, tools::create_habit::<S>),
            "habit_update" => self.invoke(arguments, tools::update_habit::<S>),
            "habit_delete" => self.invoke(arguments, tools::delete_habit::<S>),
            "habit_list" => self.invoke(arguments, tools::list_habits::<S>),
            "habit_status" => self.invoke(arguments, tools::get_habit_status::<S>),
            "habit_complete" => self.invoke(arguments, tools::complete_habit::<S>),
            "habit_uncomplete" => self.invoke(arguments, tools::uncomplete_habit::<S>),
            "habit_heatmap" => self.invoke(arguments, tools::get_heatmap::<S>),
            "habit_analytics" => self.invoke(arguments, tools::get_analytics::<S>),
            "habit_templates" => self.invoke(arguments, |_, _, params| tools::list_templates(params)),
            "habit_from_template" => self.invoke(arguments, tools::create_from_template::<S>),
            "server_health" => self.invoke(arguments, |storage, ctx, params| {
                tools::server_health(storage, ctx, &self.metrics, params)
            }),
            other => Err(ToolError::NotFound(format!("Unknown tool: {}", other))),
        }
    }

    /// Decode the arguments, run the tool and render its response as pretty JSON
    fn invoke<P, R, F>(&self, arguments: Value, tool: F) -> Result<String, ToolError>
    where
        P: DeserializeOwned,
        R: Serialize,
        F: FnOnce(&S, &ToolContext, P) -> Result<R, ToolError>,
    {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        let params: P =
            serde_json::from_value(arguments).map_err(|e| ToolError::InvalidParams(e.to_string()))?;
        let response = tool(&self.storage, &self.ctx, params)?;
        serde_json::to_string_pretty(&response).map_err(|e| ToolError::Internal(e.to_string()))
    }
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
    }
}

fn definition<P: JsonSchema>(name: &'static str, description: &'static str) -> ToolDefinition {
    let input_schema = serde_json::to_value(schemars::schema_for!(P))
        .unwrap_or_else(|_| json!({ "type": "object" }));
    ToolDefinition {
        name,
        description,
        input_schema,
    }
}

/// Every tool this server exposes, in the order tools/list reports them
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition::<tools::CreateHabitParams>("habit_create", "Create a new habit to track"),
        definition::<tools::UpdateHabitParams>(
            "habit_update",
            "Change a habit's name, description, color, icon, frequency or weekly target",
        ),
        definition::<tools::DeleteHabitParams>("habit_delete", "Delete a habit (its history is kept)"),
        definition::<tools::ListHabitsParams>("habit_list", "List habits with their streaks"),
        definition::<tools::StatusParams>(
            "habit_status",
            "Check today's status and live streak for one habit or all of them",
        ),
        definition::<tools::CompleteHabitParams>(
            "habit_complete",
            "Mark a habit complete for today or an earlier date",
        ),
        definition::<tools::CompleteHabitParams>(
            "habit_uncomplete",
            "Remove a habit's completion for today or an earlier date",
        ),
        definition::<tools::HeatmapParams>(
            "habit_heatmap",
            "Completions per day across all habits, plus summary statistics",
        ),
        definition::<tools::AnalyticsParams>(
            "habit_analytics",
            "Completion trends, rates and patterns over a trailing period",
        ),
        definition::<tools::TemplatesParams>("habit_templates", "Browse habit templates by category"),
        definition::<tools::FromTemplateParams>("habit_from_template", "Create a habit from a template"),
        definition::<tools::HealthParams>("server_health", "Server uptime, response times and recent errors"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Calendar, UserId};
    use crate::storage::SqliteStorage;
    use chrono::{TimeZone, Utc};

    fn server() -> McpServer<SqliteStorage> {
        let ctx = ToolContext::new(
            UserId::new("alice"),
            Calendar::fixed(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()),
        );
        McpServer::new(SqliteStorage::in_memory().unwrap(), ctx)
    }

    async fn call(server: &mut McpServer<SqliteStorage>, name: &str, arguments: Value) -> ToolCallResult {
        let line = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        })
        .to_string();
        let response = server.process_line(&line).await.unwrap();
        serde_json::from_value(response.result.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_tools_list() {
        let mut server = server();
        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, json!(7));

        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 12);
        assert_eq!(tools[0]["name"], json!("habit_create"));
        assert_eq!(tools[0]["inputSchema"]["type"], json!("object"));
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["name"]));
    }

    #[tokio::test]
    async fn test_complete_twice() {
        let mut server = server();
        let created = call(&mut server, "habit_create", json!({ "name": "Read" })).await;
        assert!(!created.is_error);
        let created: Value = serde_json::from_str(&created.text()).unwrap();
        let habit_id = created["habitId"].as_str().unwrap().to_string();

        let first = call(&mut server, "habit_complete", json!({ "habit_id": habit_id })).await;
        assert!(first.text().contains("Habit marked as complete"));

        let second = call(&mut server, "habit_complete", json!({ "habit_id": habit_id })).await;
        assert!(!second.is_error);
        assert!(second.text().contains("Already completed today"));
    }

    #[tokio::test]
    async fn test_tool_failures_are_results() {
        let mut server = server();

        let missing = call(&mut server, "habit_create", json!({})).await;
        assert!(missing.is_error);
        assert_eq!(missing.error_code, Some(error_codes::INVALID_PARAMS));

        let unknown = call(&mut server, "habit_status", json!({ "habit_id": crate::domain::HabitId::new().to_string() })).await;
        assert_eq!(unknown.error_code, Some(error_codes::NOT_FOUND));

        let health = call(&mut server, "server_health", Value::Null).await;
        let health: Value = serde_json::from_str(&health.text()).unwrap();
        assert_eq!(health["recordedRequests"], json!(2));
        assert_eq!(health["errorsLast24h"], json!(2));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let mut server = server();

        let parse = server.process_line("{not json").await.unwrap();
        assert_eq!(parse.error.unwrap().code, error_codes::PARSE_ERROR);

        let method = server
            .process_line(r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(method.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

        assert!(server.process_line("   ").await.is_none());
        assert!(server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
        assert!(server.is_initialized());
    }
}
