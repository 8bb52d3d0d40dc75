//! Registry-level error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two registrations claimed the same `(actionRef, schemaVersion)` key.
    #[error("duplicate registration for {action_ref}:{schema_version}")]
    DuplicateRegistration {
        action_ref: String,
        schema_version: String,
    },
}
