//! Shared helpers for mock-server tests

#![allow(dead_code)]

use serde_json::{Value as Json, json};
use spotinst_sdk::{Config, Session, Value};
use wiremock::{MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const ACCOUNT: &str = "act-test";

/// Session pointed at `server`, with fixed credentials and no discovery
pub fn session(server: &MockServer) -> Session {
    Session::builder()
        .config(
            Config::new()
                .with_base_url(&server.uri())
                .unwrap()
                .with_credentials(Value::new(TOKEN, ACCOUNT)),
        )
        .without_discovery()
        .build()
        .unwrap()
}

/// Successful response envelope around `items`
pub fn envelope(kind: &str, items: Vec<Json>) -> Json {
    json!({
        "request": {"id": "req-test"},
        "response": {
            "status": {"code": 200, "message": "OK"},
            "kind": kind,
            "items": items,
            "count": items.len()
        }
    })
}

pub fn ok(kind: &str, items: Vec<Json>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(kind, items))
}

/// Error envelope with a single error entry
pub fn api_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "request": {"id": "req-err"},
        "response": {
            "status": {"code": status, "message": "error"},
            "errors": [{"code": code, "message": message}]
        }
    }))
}

/// Number of requests the server has seen
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
