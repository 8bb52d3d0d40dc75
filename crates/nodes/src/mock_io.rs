//! The mock-IO overlay — deterministic synthetic handlers for a fixed set of
//! externally-effecting actions.
//!
//! Exercised in `verify` mode (or whenever `--mock-io` is passed) so a
//! workflow can run end-to-end without performing real HTTP requests, file
//! writes, LLM calls, or SQLite access. The action set and the response
//! shapes are grounded in the reference runner's synthetic handler table.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{ActionHandler, HandlerError, NodeContext};

pub struct HttpGet;

#[async_trait]
impl ActionHandler for HttpGet {
    async fn call(&self, _node: &NodeContext, _input: &Value) -> Result<Value, HandlerError> {
        let body = json!({
            "query": {
                "search": [
                    { "title": "Mock Title 1" },
                    { "title": "Mock Title 2" },
                ]
            }
        });
        Ok(json!({ "status": 200, "body": body.clone(), "json": body }))
    }
}

pub struct HttpPost;

#[async_trait]
impl ActionHandler for HttpPost {
    async fn call(&self, _node: &NodeContext, _input: &Value) -> Result<Value, HandlerError> {
        Ok(json!({ "status": 200, "body": { "mock": true } }))
    }
}

pub struct FilesWrite;

#[async_trait]
impl ActionHandler for FilesWrite {
    async fn call(&self, _node: &NodeContext, input: &Value) -> Result<Value, HandlerError> {
        let bytes_written = input
            .get("content")
            .and_then(Value::as_str)
            .map(|s| s.len())
            .unwrap_or(0);
        Ok(json!({ "bytesWritten": bytes_written }))
    }
}

pub struct TransformJq;

#[async_trait]
impl ActionHandler for TransformJq {
    async fn call(&self, _node: &NodeContext, input: &Value) -> Result<Value, HandlerError> {
        let data = input.get("data").cloned().unwrap_or_else(|| json!([]));
        Ok(json!({ "result": data }))
    }
}

pub struct LlmComplete;

#[async_trait]
impl ActionHandler for LlmComplete {
    async fn call(&self, _node: &NodeContext, input: &Value) -> Result<Value, HandlerError> {
        let text = match input.get("prompt").and_then(Value::as_str) {
            Some(prompt) => format!("Mock: {}", prompt.chars().take(20).collect::<String>()),
            None => "Mock summary".to_string(),
        };
        Ok(json!({ "text": text }))
    }
}

pub struct SqliteCreateDb;

#[async_trait]
impl ActionHandler for SqliteCreateDb {
    async fn call(&self, _node: &NodeContext, input: &Value) -> Result<Value, HandlerError> {
        let path = input
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or("/tmp/mock.sqlite");
        Ok(json!({ "status": "ok", "path": path }))
    }
}

pub struct SqliteCreateTable;

#[async_trait]
impl ActionHandler for SqliteCreateTable {
    async fn call(&self, _node: &NodeContext, input: &Value) -> Result<Value, HandlerError> {
        let table = input
            .get("table")
            .and_then(Value::as_str)
            .unwrap_or("mock_table");
        Ok(json!({ "status": "ok", "table": table }))
    }
}

pub struct SqliteInsertRow;

#[async_trait]
impl ActionHandler for SqliteInsertRow {
    async fn call(&self, _node: &NodeContext, _input: &Value) -> Result<Value, HandlerError> {
        Ok(json!({ "status": "ok", "rowId": 1 }))
    }
}

pub struct SqliteQuery;

#[async_trait]
impl ActionHandler for SqliteQuery {
    async fn call(&self, _node: &NodeContext, _input: &Value) -> Result<Value, HandlerError> {
        Ok(json!({
            "status": "ok",
            "rows": [
                { "id": 1, "name": "Alice" },
                { "id": 2, "name": "Bob" },
            ]
        }))
    }
}

/// Look up the mock handler for a given `actionRef`, if the overlay covers it.
///
/// Only a fixed, small set of externally-effecting actions have a mock.
/// Actions outside this table are unaffected by the mock-IO overlay even
/// when it is active.
pub fn lookup(action_ref: &str) -> Option<Arc<dyn ActionHandler>> {
    let handler: Arc<dyn ActionHandler> = match action_ref {
        "plugin.http.get" => Arc::new(HttpGet),
        "plugin.http.post" => Arc::new(HttpPost),
        "plugin.files.write" => Arc::new(FilesWrite),
        "plugin.transform.jq" => Arc::new(TransformJq),
        "plugin.llm.complete" => Arc::new(LlmComplete),
        "plugin.sqlite.create_db" => Arc::new(SqliteCreateDb),
        "plugin.sqlite.create_table" => Arc::new(SqliteCreateTable),
        "plugin.sqlite.insert_row" => Arc::new(SqliteInsertRow),
        "plugin.sqlite.query" => Arc::new(SqliteQuery),
        _ => return None,
    };
    Some(handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> NodeContext {
        NodeContext {
            id: "n".into(),
            action_ref: "plugin.http.get".into(),
            schema_version: "v1".into(),
        }
    }

    #[tokio::test]
    async fn http_get_returns_deterministic_body() {
        let out = HttpGet.call(&ctx(), &Value::Null).await.unwrap();
        assert_eq!(out["status"], 200);
        assert!(out["json"]["query"]["search"].is_array());
    }

    #[tokio::test]
    async fn files_write_counts_bytes() {
        let out = FilesWrite
            .call(&ctx(), &json!({ "content": "hello" }))
            .await
            .unwrap();
        assert_eq!(out["bytesWritten"], 5);
    }

    #[test]
    fn lookup_is_limited_to_known_actions() {
        assert!(lookup("plugin.http.get").is_some());
        assert!(lookup("plugin.core.echo").is_none());
    }
}
