//! Engine-level error types and the exit-code mapping in `spec` §7.
//!
//! Rust's type system absorbs one corner of the original taxonomy: a
//! non-string `actionRef` can't even deserialize into [`crate::models::Node`],
//! so it surfaces as a [`LoadError`] (exit 2) rather than the dynamically
//! typed original's runtime "bad actionRef type" Graph error (exit 3). See
//! DESIGN.md for the full note; no testable property in the spec depends on
//! that specific exit code.

use thiserror::Error;

/// Structural failures while parsing the workflow IR (`spec` §4.1, §7). Exit 2.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read workflow file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path} as JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {path} as YAML: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("top-level workflow value must be a mapping")]
    NotAMapping,

    #[error("workflow 'kind' must be \"process\"")]
    WrongKind,

    #[error("workflow 'nodes' must be a non-empty array")]
    EmptyNodes,
}

/// Structural shape and topology failures (`spec` §4.2, §7). Exit 3.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DagError {
    #[error("duplicate node id: '{0}'")]
    DuplicateNodeId(String),

    #[error("node '{node_id}' depends on unknown node '{depends_on}'")]
    UnknownDependency { node_id: String, depends_on: String },

    #[error("cycle detected: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// Errors from walking and substituting `$ref` leaves (`spec` §4.3).
///
/// `Retryable` should only ever arise from a `$ref` to a node id not yet in
/// the output context, which a valid topological order makes unreachable —
/// kept distinct from `Permanent` so the executor can still route it through
/// the normal retry-budget accounting instead of panicking on an
/// impossible-in-practice condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0}")]
    Permanent(String),
    #[error("{0}")]
    Retryable(String),
}

/// The top-level error a single workflow run can terminate with.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Dag(#[from] DagError),

    /// No handler registered for `(actionRef, schemaVersion)`, and the
    /// mock-IO overlay (if active) doesn't cover it either.
    #[error("action not implemented: {action_ref}:{schema_version}")]
    UnknownAction {
        node_id: String,
        action_ref: String,
        schema_version: String,
    },

    /// Quarantine hit, resolver failure, retry exhaustion, a declared
    /// permanent handler error, or a non-object handler return — all of
    /// these are node-scoped exit-4 failures with the same
    /// `NODE_FAILED: <id>: <message>` shape.
    #[error("node '{node_id}': {message}")]
    NodeFailed { node_id: String, message: String },
}

impl RunError {
    /// The process exit code this error maps to, per `spec` §6.1/§7.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Load(_) => 2,
            RunError::Dag(_) => 3,
            RunError::UnknownAction { .. } => 3,
            RunError::NodeFailed { .. } => 4,
        }
    }

    /// The `NODE_FAILED: ...` terminal line described in `spec` §6.1.
    pub fn terminal_line(&self) -> String {
        match self {
            RunError::Load(e) => format!("NODE_FAILED: {e}"),
            RunError::Dag(DagError::Cycle(ids)) => {
                format!("NODE_FAILED: cycle detected: {}", ids.join(", "))
            }
            RunError::Dag(e) => format!("NODE_FAILED: {e}"),
            RunError::UnknownAction { node_id, .. } => {
                format!("NODE_FAILED: {node_id}: {self}")
            }
            RunError::NodeFailed { node_id, message } => {
                format!("NODE_FAILED: {node_id}: {message}")
            }
        }
    }
}
