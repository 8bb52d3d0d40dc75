//! `engine` crate — the workflow execution engine's core: IR loading, DAG
//! validation/ordering, `$ref` resolution, the per-node retry/timeout state
//! machine, the append-only metrics journal, and the driver that ties them
//! together into a single sequential pass over a workflow.

pub mod config;
pub mod dag;
pub mod driver;
pub mod error;
pub mod executor;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod resolver;

pub use config::{EngineConfig, Mode};
pub use dag::topo_sort as validate_dag;
pub use driver::run_workflow;
pub use error::{DagError, LoadError, ResolveError, RunError};
pub use loader::load_workflow;
pub use models::{Node, RetryPolicy, Workflow};
