//! Testes de integração do servidor JSON-RPC.

use std::io::Cursor;
use std::sync::Arc;

use geoplot::orchestrator::PlotService;
use geoplot::server::{LineTransport, PlotServer, METHOD_NOT_FOUND};
use geoplot::Config;
use serde_json::{json, Value};

/// Cria uma linha JSON-RPC.
fn jsonrpc_request(id: u64, method: &str, params: Option<Value>) -> String {
    let mut req = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
    });
    if let Some(p) = params {
        req["params"] = p;
    }
    format!("{}\n", req)
}

fn tool_call(id: u64, name: &str, arguments: Value) -> String {
    jsonrpc_request(
        id,
        "tools/call",
        Some(json!({"name": name, "arguments": arguments})),
    )
}

/// Roda uma sessão completa e devolve as respostas.
async fn session(server: &mut PlotServer, lines: &[String]) -> Vec<Value> {
    let input = lines.concat();
    let mut transport = LineTransport::new(Cursor::new(input.into_bytes()), Vec::new());

    server.run(&mut transport).await.unwrap();

    String::from_utf8(transport.into_writer())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Texto da primeira parte de um resultado de ferramenta, como JSON.
fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[tokio::test]
async fn test_full_session() {
    let mut server = PlotServer::new(Config::default()).unwrap();

    let responses = session(
        &mut server,
        &[
            jsonrpc_request(1, "initialize", Some(json!({}))),
            jsonrpc_request(2, "tools/list", None),
            tool_call(3, "geoplot_chart", json!({"first_term": 1, "ratio": 0.5})),
            tool_call(4, "geoplot_surface", json!({"equation": "x * y"})),
            tool_call(5, "geoplot_latex", json!({"first_term": 1, "ratio": 0.5})),
            tool_call(6, "geoplot_status", json!({})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 6);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "geoplot");
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 4);

    let chart = tool_payload(&responses[2]);
    assert_eq!(chart["content"]["series"][0]["y"][4], 1.9375);

    let surface = tool_payload(&responses[3]);
    assert_eq!(surface["kind"], "surface");
    assert_eq!(surface["content"]["data"][0]["z"].as_array().unwrap().len(), 400);

    let latex = tool_payload(&responses[4]);
    assert!(latex["content"].as_str().unwrap().contains(r"\sum_{i=1}^\infty"));

    let status = tool_payload(&responses[5]);
    assert_eq!(status["cache"]["size"], 3);
    assert_eq!(status["cache"]["misses"], 3);
}

#[tokio::test]
async fn test_errors_do_not_stop_the_server() {
    let mut server = PlotServer::new(Config::default()).unwrap();

    let responses = session(
        &mut server,
        &[
            tool_call(1, "geoplot_surface", json!({"equation": "__import__('os')"})),
            tool_call(2, "geoplot_surface", json!({"equation": "x; y"})),
            tool_call(3, "geoplot_chart", json!({"first_term": 1})),
            jsonrpc_request(4, "prompts/list", None),
            "{not json}\n".to_string(),
            tool_call(5, "geoplot_chart", json!({"first_term": 2, "ratio": 2})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 6);
    for response in &responses[..3] {
        assert_eq!(response["result"]["isError"], true);
    }
    assert_eq!(responses[3]["error"]["code"], METHOD_NOT_FOUND);
    assert!(responses[4]["id"].is_null());

    let chart = tool_payload(&responses[5]);
    assert_eq!(chart["content"]["convergence"], "diverges");
}

#[tokio::test]
async fn test_cache_shared_across_sessions() {
    let mut config = Config::default();
    config.cache.capacity = 2;
    let service = Arc::new(PlotService::with_default_renderer(config).unwrap());

    let mut first = PlotServer::with_service(Arc::clone(&service));
    session(
        &mut first,
        &[
            tool_call(1, "geoplot_chart", json!({"first_term": 1, "ratio": 0.5})),
            tool_call(2, "geoplot_chart", json!({"first_term": 1, "ratio": 0.25})),
        ],
    )
    .await;

    let mut second = PlotServer::with_service(Arc::clone(&service));
    session(
        &mut second,
        &[
            tool_call(1, "geoplot_chart", json!({"first_term": 1, "ratio": 0.5})),
            tool_call(2, "geoplot_chart", json!({"first_term": 1, "ratio": 0.125})),
        ],
    )
    .await;

    let stats = service.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.size, 2);
}
