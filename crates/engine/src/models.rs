//! Core domain models for the workflow engine — the in-memory shape every
//! workflow IR (JSON or YAML) is parsed into before validation begins.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_schema_version() -> String {
    "v1".to_string()
}

fn default_max_attempts() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Retry/backoff policy attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Must be >= 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Milliseconds to sleep between attempts. No exponential adjustment.
    #[serde(default)]
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single vertex in the workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within the workflow (referenced by `dependsOn` and `$ref`).
    pub id: String,
    /// `plugin.<family>.<name>` — the action this node invokes.
    #[serde(rename = "actionRef")]
    pub action_ref: String,
    /// Handler schema version; defaults to `"v1"`.
    #[serde(rename = "schemaVersion", default = "default_schema_version")]
    pub schema_version: String,
    /// IDs of nodes that must complete before this one runs.
    #[serde(rename = "dependsOn", default)]
    pub depends_on: BTreeSet<String>,
    /// Arbitrary structured input, possibly containing `$ref` leaves.
    #[serde(default = "default_input")]
    pub input: Value,
    /// Retry policy; absent means "run once, no retry."
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
    /// Cooperative timeout in milliseconds; `0` or absent means no timeout.
    #[serde(rename = "timeoutMs", default)]
    pub timeout_ms: Option<u64>,
}

fn default_input() -> Value {
    Value::Object(Default::default())
}

impl Node {
    /// The node's effective retry policy (`RetryPolicy::default()` when absent).
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default()
    }

    /// The node's effective timeout; `None` means "no timeout enforced."
    pub fn timeout(&self) -> Option<std::time::Duration> {
        match self.timeout_ms {
            Some(0) | None => None,
            Some(ms) => Some(std::time::Duration::from_millis(ms)),
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// The parsed workflow IR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Must equal `"process"`; checked by the loader before this type is
    /// even constructed — retained here so a `Workflow` can be
    /// round-tripped and re-validated.
    pub kind: String,
    pub nodes: Vec<Node>,
}
