//! Handler-level error type.

use thiserror::Error;

/// Errors returned by an [`crate::ActionHandler`]'s `call` method.
///
/// The executor uses the variant to decide retry behaviour:
/// - `Retryable` — the node is re-attempted, up to the node's `maxAttempts`.
/// - `Permanent` — the node fails immediately; no retry is attempted.
#[derive(Debug, Error, Clone)]
pub enum HandlerError {
    /// Transient failure; the executor should retry.
    #[error("retryable handler error: {0}")]
    Retryable(String),

    /// Permanent failure; no retry should be attempted.
    #[error("fatal handler error: {0}")]
    Permanent(String),
}

impl HandlerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, HandlerError::Retryable(_))
    }
}
