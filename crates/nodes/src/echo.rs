//! `plugin.core.echo` — the simplest built-in action: returns its input.
//!
//! Doubles as the minimal reference implementation of [`ActionHandler`] and
//! as the action used by the golden-path scenarios in the integration
//! tests.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{ActionHandler, HandlerError, NodeContext};

pub struct Echo;

#[async_trait]
impl ActionHandler for Echo {
    async fn call(
        &self,
        _node: &NodeContext,
        resolved_input: &Value,
    ) -> Result<Value, HandlerError> {
        match resolved_input {
            Value::Object(_) => Ok(resolved_input.clone()),
            Value::Null => Ok(json!({})),
            other => Ok(json!({ "value": other })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_object_input_unchanged() {
        let node = NodeContext {
            id: "a".into(),
            action_ref: "plugin.core.echo".into(),
            schema_version: "v1".into(),
        };
        let input = json!({ "message": "hi" });
        let out = Echo.call(&node, &input).await.unwrap();
        assert_eq!(out, input);
    }

    #[tokio::test]
    async fn wraps_non_object_input() {
        let node = NodeContext {
            id: "a".into(),
            action_ref: "plugin.core.echo".into(),
            schema_version: "v1".into(),
        };
        let out = Echo.call(&node, &json!("hello")).await.unwrap();
        assert_eq!(out, json!({ "value": "hello" }));
    }
}
