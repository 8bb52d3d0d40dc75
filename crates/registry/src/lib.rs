//! `registry` crate — the `(actionRef, schemaVersion) -> ActionHandler` table
//! and the quarantine deny-list.
//!
//! Per the design notes carried over from the distilled specification,
//! handler discovery is a static registration table rather than a
//! filesystem scan: the reference implementation's directory-scan-and-import
//! loader is an implementation detail of its source language, not part of
//! the observable contract. [`ActionRegistry::builtin`] registers the
//! handlers this crate ships with; callers add more via
//! [`ActionRegistry::register`].

pub mod error;
pub mod quarantine;
pub mod registry;

pub use error::RegistryError;
pub use quarantine::QuarantineList;
pub use registry::ActionRegistry;
