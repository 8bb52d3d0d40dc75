//! Node executor (`spec` §4.5) — drives one node through its
//! resolve/attempt/timeout/backoff state machine.
//!
//! ```text
//!        READY
//!          │ resolve input
//!          ▼
//!      RESOLVING ──permanent──► FAILED
//!          │ retryable (budget-counted; unreachable under a valid
//!          │ topological order, see crate::resolver)
//!          ▼
//!      ATTEMPT k ◄────────────────┐
//!          │ invoke handler       │ k < maxAttempts
//!          ▼                      │ and (retryable or unknown)
//!       RUNNING ──raises──► ERROR ┘ sleep(backoffMs)
//!          │ returns mapping
//!          ▼
//!       SUCCESS
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::warn;

use nodes::{ActionHandler, HandlerError, NodeContext};

use crate::config::Mode;
use crate::error::ResolveError;
use crate::models::Node;
use crate::resolver::resolve_input;

type OutputContext = std::collections::HashMap<String, Value>;

/// Drive a single node through its retry/timeout state machine.
///
/// Returns the handler's JSON output on success, or a human-readable
/// failure message on permanent failure or retry exhaustion — the driver
/// wraps that message into a node-scoped [`crate::error::RunError`].
pub async fn execute_node(
    node: &Node,
    node_ctx: &NodeContext,
    handler: Arc<dyn ActionHandler>,
    context: &OutputContext,
    mode: Mode,
    debug_ref: bool,
) -> Result<Value, String> {
    let policy = node.retry_policy();
    let timeout = node.timeout();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let resolved = match resolve_input(&node.input, context, mode, debug_ref) {
            Ok(value) => value,
            Err(ResolveError::Permanent(msg)) => return Err(msg),
            Err(ResolveError::Retryable(msg)) => {
                if attempt >= policy.max_attempts {
                    return Err(msg);
                }
                warn!(node = %node.id, attempt, "retryable resolution failure, retrying: {msg}");
                sleep_backoff(policy.backoff_ms).await;
                continue;
            }
        };

        let start = Instant::now();
        let outcome = invoke(handler.clone(), node_ctx.clone(), resolved).await;
        let elapsed = start.elapsed();

        let retry_message = match outcome {
            Ok(value) => {
                if !value.is_object() {
                    return Err("handler must return object".to_string());
                }
                match timeout {
                    Some(limit) if elapsed > limit => format!(
                        "timeout exceeded: {}ms > {}ms",
                        elapsed.as_millis(),
                        limit.as_millis()
                    ),
                    _ => return Ok(value),
                }
            }
            Err(HandlerError::Permanent(msg)) => return Err(msg),
            Err(HandlerError::Retryable(msg)) => msg,
        };

        if attempt >= policy.max_attempts {
            return Err(retry_message);
        }
        warn!(
            node = %node.id,
            attempt,
            max_attempts = policy.max_attempts,
            "retryable failure, retrying: {retry_message}"
        );
        sleep_backoff(policy.backoff_ms).await;
    }
}

async fn sleep_backoff(backoff_ms: u64) {
    if backoff_ms > 0 {
        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
    }
}

/// Invoke the handler on a spawned task so a handler panic turns into a
/// retryable error instead of taking the whole process down — the Rust
/// analogue of the source's "any unclassified exception is retryable" rule,
/// since a panic is the only way a Rust handler can misbehave outside its
/// typed `Result<Value, HandlerError>` contract.
async fn invoke(
    handler: Arc<dyn ActionHandler>,
    node_ctx: NodeContext,
    resolved_input: Value,
) -> Result<Value, HandlerError> {
    let task = tokio::spawn(async move { handler.call(&node_ctx, &resolved_input).await });
    match task.await {
        Ok(result) => result,
        Err(join_error) => Err(HandlerError::Retryable(format!(
            "handler panicked: {join_error}"
        ))),
    }
}
