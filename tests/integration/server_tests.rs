/// JSON-RPC sessions against a file-backed server
use chrono::{TimeZone, Utc};
use habit_streak_mcp::mcp::protocol::{JsonRpcResponse, ToolCallResult, MCP_VERSION};
use habit_streak_mcp::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

struct Session {
    server: McpServer<SqliteStorage>,
    next_id: u64,
    _db: NamedTempFile,
}

impl Session {
    fn new() -> Self {
        let db = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(db.path().to_path_buf()).expect("Failed to create storage");
        let ctx = ToolContext::new(
            UserId::new("alice"),
            Calendar::fixed(Utc.with_ymd_and_hms(2024, 6, 2, 18, 30, 0).unwrap()),
        );
        Self {
            server: McpServer::new(storage, ctx),
            next_id: 0,
            _db: db,
        }
    }

    async fn request(&mut self, method: &str, params: Value) -> JsonRpcResponse {
        self.next_id += 1;
        let line = json!({ "jsonrpc": "2.0", "id": self.next_id, "method": method, "params": params });
        self.server
            .process_line(&line.to_string())
            .await
            .expect("Requests with an id always get a response")
    }

    async fn call(&mut self, name: &str, arguments: Value) -> Value {
        let response = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await;
        let result: ToolCallResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert!(!result.is_error, "{} failed: {}", name, result.text());
        serde_json::from_str(&result.text()).unwrap()
    }
}

#[tokio::test]
async fn test_initialize_handshake() {
    let mut session = Session::new();
    let response = session.request("initialize", json!({})).await;
    let result = response.result.unwrap();

    assert_eq!(result["protocolVersion"], json!(MCP_VERSION));
    assert_eq!(result["capabilities"]["tools"]["listChanged"], json!(false));
    assert_eq!(result["serverInfo"]["name"], json!("Habit Streak MCP"));
}

#[tokio::test]
async fn test_heatmap_over_two_habits() {
    let mut session = Session::new();

    let a = session.call("habit_create", json!({ "name": "A" })).await["habitId"].clone();
    let b = session.call("habit_create", json!({ "name": "B" })).await["habitId"].clone();
    session.call("habit_complete", json!({ "habit_id": a, "date": "2024-06-01" })).await;
    session.call("habit_complete", json!({ "habit_id": a })).await;
    session.call("habit_complete", json!({ "habit_id": b, "date": "2024-06-01" })).await;

    let view = session
        .call("habit_heatmap", json!({ "start_date": "2024-06-01", "end_date": "2024-06-02" }))
        .await;

    assert_eq!(view["heatmap"]["2024-06-01"]["count"], json!(2));
    let contributors = view["heatmap"]["2024-06-01"]["habits"].as_array().unwrap();
    assert_eq!(contributors.len(), 2);
    assert!(contributors.contains(&a) && contributors.contains(&b));
    assert_eq!(view["heatmap"]["2024-06-02"]["count"], json!(1));
    assert_eq!(view["heatmap"]["2024-06-02"]["habits"], json!([a]));
    assert_eq!(view["stats"]["todayCompletions"], json!(1));
}

#[tokio::test]
async fn test_template_to_status() {
    let mut session = Session::new();

    let templates = session.call("habit_templates", json!({ "category": "mindfulness" })).await;
    let template_id = templates["templates"][0]["id"].clone();

    let created = session
        .call("habit_from_template", json!({ "template_id": template_id }))
        .await;
    let habit_id = created["habitId"].clone();

    let done = session.call("habit_complete", json!({ "habit_id": habit_id })).await;
    assert_eq!(done["changed"], json!(true));
    assert_eq!(done["habit"]["currentStreak"], json!(1));

    let status = session.call("habit_status", json!({})).await;
    assert_eq!(status["summary"], json!("1 of 1 habits completed today"));

    let analytics = session.call("habit_analytics", json!({ "period": 7 })).await;
    assert_eq!(analytics["overview"]["totalCompletions"], json!(1));
    assert_eq!(analytics["timeOfDay"]["evening"], json!(1));
}
