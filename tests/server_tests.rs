//! Full stdio sessions over in-memory buffers.

mod common;

use common::{gateway, FakeOdoo};
use odoo_mcp_server::server::McpServer;
use serde_json::{json, Value};

async fn run_session(server: &mut McpServer, lines: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for line in lines {
        input.push_str(&line.to_string());
        input.push('\n');
    }
    let mut output: Vec<u8> = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn session_handshake_then_tool_call() {
    let fake = FakeOdoo::new().shared();
    let mut server = McpServer::new(gateway(&fake, false));

    let responses = run_session(
        &mut server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {
                "name": "count_records",
                "arguments": {"model": "res.partner"}
            }}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2, "notifications get no response");
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "odoo-mcp-server");
    assert_eq!(responses[1]["id"], 2);
    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    let value: Value = serde_json::from_str(text).unwrap();
    assert_eq!(value["count"], 3);
}

#[tokio::test]
async fn requests_before_initialize_are_rejected() {
    let fake = FakeOdoo::new().shared();
    let mut server = McpServer::new(gateway(&fake, false));

    let responses = run_session(
        &mut server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"]["code"], -32600);
    assert_eq!(responses[0]["error"]["message"], "Server not initialized");
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn malformed_lines_get_protocol_errors() {
    let fake = FakeOdoo::new().shared();
    let mut server = McpServer::new(gateway(&fake, false));

    let mut output: Vec<u8> = Vec::new();
    let input = "{not json\n\n{\"jsonrpc\":\"1.0\",\"id\":9,\"method\":\"ping\"}\n";
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2, "blank lines are skipped");
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert!(responses[0].get("id").is_none());
    assert_eq!(responses[1]["error"]["code"], -32600);
    assert_eq!(responses[1]["id"], 9);
}

#[tokio::test]
async fn oversized_line_is_a_parse_error() {
    let fake = FakeOdoo::new().shared();
    let mut server = McpServer::new(gateway(&fake, false));

    let line = vec![b' '; 1024 * 1024 + 1];
    let resp = server.handle_line(&line).await.unwrap();
    assert_eq!(resp.error.unwrap().code, -32700);
}
