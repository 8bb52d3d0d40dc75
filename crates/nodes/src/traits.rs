//! The `ActionHandler` trait — the contract every action implementation must fulfil.

use async_trait::async_trait;
use serde_json::Value;

use crate::HandlerError;

/// The slice of a node's identity a handler is allowed to see.
///
/// Mirrors the relevant fields of `engine::models::Node` without making
/// `nodes` depend on `engine` — the engine crate builds one of these for
/// every node it dispatches.
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub id: String,
    pub action_ref: String,
    pub schema_version: String,
}

/// The core handler trait.
///
/// Every built-in action and the mock-IO overlay implement this. A handler
/// has no access to the output context — any dependency on an upstream
/// node's output must already be present in `resolved_input` by the time
/// `call` runs.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Execute the action and return its JSON output.
    ///
    /// `resolved_input` has already had every `$ref` leaf substituted by
    /// the resolver. Implementations must not mutate `node` or
    /// `resolved_input`, and must return a JSON object — a non-object
    /// return is treated by the executor as a permanent error.
    async fn call(
        &self,
        node: &NodeContext,
        resolved_input: &Value,
    ) -> Result<Value, HandlerError>;
}
