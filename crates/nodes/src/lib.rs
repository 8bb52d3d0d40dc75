//! `nodes` crate — the `ActionHandler` trait, the mock-IO overlay, and a
//! small set of built-in reference actions.
//!
//! Real production actions (HTTP, SQLite, LLM calls, text transforms, …)
//! are pluggable external collaborators described only by the handler
//! contract here; this crate carries just enough of them — the mock-IO
//! overlay, plus a trivial `plugin.core.echo` — to let a workflow run
//! end-to-end without live side effects.

pub mod echo;
pub mod error;
pub mod mock_io;
pub mod test_node;
pub mod traits;

pub use error::HandlerError;
pub use traits::{ActionHandler, NodeContext};
