//! The action registry itself: a static `(actionRef, schemaVersion)` table
//! plus the mock-IO overlay gate.

use std::collections::HashMap;
use std::sync::Arc;

use nodes::{echo, mock_io, ActionHandler};
use tracing::warn;

use crate::RegistryError;

type ActionKey = (String, String);

/// Maps `(actionRef, schemaVersion)` to a registered handler.
///
/// Registration happens once at process start and the table is treated as
/// immutable afterwards — nothing in the core mutates it mid-run.
pub struct ActionRegistry {
    handlers: HashMap<ActionKey, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// An empty registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry seeded with this crate's built-in reference actions.
    ///
    /// Currently just `plugin.core.echo:v1`. Everything else a workflow
    /// names must either be registered by the embedding application or
    /// served out of the mock-IO overlay.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register("plugin.core.echo", "v1", Arc::new(echo::Echo))
            .expect("builtin registration cannot collide");
        registry
    }

    /// Register a handler under `(actionRef, schemaVersion)`.
    ///
    /// Per the source's "loading errors on individual modules are silently
    /// skipped" rule, a duplicate registration does not panic the process —
    /// it is logged and the earlier registration wins. The `Err` return
    /// lets callers that care (tests, strict startup checks) detect the
    /// collision.
    pub fn register(
        &mut self,
        action_ref: impl Into<String>,
        schema_version: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), RegistryError> {
        let key = (action_ref.into(), schema_version.into());
        if self.handlers.contains_key(&key) {
            warn!(
                action_ref = %key.0,
                schema_version = %key.1,
                "skipping duplicate action registration"
            );
            return Err(RegistryError::DuplicateRegistration {
                action_ref: key.0,
                schema_version: key.1,
            });
        }
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Resolve the handler that should run for `(actionRef, schemaVersion)`.
    ///
    /// When `mock_io` is set and the mock-IO overlay covers this action, the
    /// mock always wins — even if a real handler is also registered. When
    /// `mock_io` is set but the overlay does not cover this action, the real
    /// handler (if any) is used, matching "if the real handler is absent,
    /// the mock substitutes."
    pub fn resolve(
        &self,
        action_ref: &str,
        schema_version: &str,
        mock_io: bool,
    ) -> Option<Arc<dyn ActionHandler>> {
        if mock_io {
            if let Some(mock) = mock_io::lookup(action_ref) {
                return Some(mock);
            }
        }
        self.handlers
            .get(&(action_ref.to_string(), schema_version.to_string()))
            .cloned()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodes::test_node::TestNode;
    use serde_json::{json, Value};

    #[test]
    fn builtin_registry_resolves_echo() {
        let registry = ActionRegistry::builtin();
        assert!(registry.resolve("plugin.core.echo", "v1", false).is_some());
        assert!(registry.resolve("plugin.core.echo", "v2", false).is_none());
    }

    #[tokio::test]
    async fn mock_io_wins_when_both_exist() {
        let mut registry = ActionRegistry::empty();
        registry
            .register(
                "plugin.http.get",
                "v1",
                Arc::new(TestNode::returning("real", json!({"real": true}))),
            )
            .unwrap();

        let resolved = registry
            .resolve("plugin.http.get", "v1", true)
            .expect("mock should cover plugin.http.get");

        let ctx = nodes::NodeContext {
            id: "n".into(),
            action_ref: "plugin.http.get".into(),
            schema_version: "v1".into(),
        };
        let out = resolved.call(&ctx, &Value::Null).await.unwrap();
        // The mock's shape (`status`/`json`), not the real handler's
        // (`node`/`value`), proves the mock actually won.
        assert_eq!(out["status"], 200);
        assert!(out.get("node").is_none());
    }

    #[test]
    fn mock_io_falls_back_to_real_handler_when_uncovered() {
        let mut registry = ActionRegistry::empty();
        registry
            .register(
                "plugin.custom.thing",
                "v1",
                Arc::new(TestNode::returning("custom", json!({}))),
            )
            .unwrap();

        assert!(registry
            .resolve("plugin.custom.thing", "v1", true)
            .is_some());
    }

    #[test]
    fn unresolved_action_is_none() {
        let registry = ActionRegistry::builtin();
        assert!(registry.resolve("plugin.nope.nope", "v1", false).is_none());
    }
}
