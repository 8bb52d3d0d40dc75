//! Workflow driver (`spec` §4.6) — the top-level orchestrator.
//!
//! Owns the output context and makes a single pass over the topological
//! order computed by [`crate::dag::topo_sort`]. For each node: resolve the
//! handler (applying the mock-IO overlay, failing on an unknown action
//! before the quarantine gate is even considered), apply the quarantine
//! gate, either stamp a dry-run placeholder or run the resolver/executor
//! pair, write the result into the context, and append one metrics record.
//! The first terminal failure stops the run; no sibling branches are
//! attempted.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Value};
use tracing::{error, info, instrument};

use nodes::NodeContext;
use registry::{ActionRegistry, QuarantineList};

use crate::config::EngineConfig;
use crate::dag::topo_sort;
use crate::error::RunError;
use crate::executor::execute_node;
use crate::metrics::{MetricsJournal, NodeResult, WorkflowResult};
use crate::models::Workflow;

type OutputContext = HashMap<String, Value>;

/// Run `workflow` (already loaded from `workflow_path`) to completion.
///
/// Returns `Ok(())` only when every node succeeds; the first terminal
/// failure is returned verbatim and the run stops — no partial-success
/// reporting, matching `spec` §7's propagation policy.
#[instrument(skip(workflow, config, registry, quarantine), fields(path = %workflow_path.display()))]
pub async fn run_workflow(
    workflow_path: &Path,
    workflow: &Workflow,
    config: &EngineConfig,
    registry: &ActionRegistry,
    quarantine: &QuarantineList,
) -> Result<(), RunError> {
    let order = topo_sort(workflow)?;
    info!(nodes = order.len(), ?order, "topological order computed");

    let journal = MetricsJournal::new(&config.runs_dir);
    let node_map: HashMap<&str, &crate::models::Node> =
        workflow.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let mut context: OutputContext = HashMap::new();

    let abs_path = workflow_path
        .canonicalize()
        .unwrap_or_else(|_| workflow_path.to_path_buf());

    for node_id in &order {
        let node = node_map[node_id.as_str()];

        // Unknown-action is checked ahead of the quarantine gate, matching
        // `original_source/runner.py`'s precedence: a handler-not-found
        // (exit 3) is reported before a quarantine hit (exit 4) would even
        // be considered, rather than the reverse.
        let handler = registry.resolve(&node.action_ref, &node.schema_version, config.mock_io);

        let Some(handler) = handler else {
            let err = RunError::UnknownAction {
                node_id: node_id.clone(),
                action_ref: node.action_ref.clone(),
                schema_version: node.schema_version.clone(),
            };
            journal.append(&NodeResult::failure(
                node_id,
                &node.action_ref,
                &node.schema_version,
                &err.to_string(),
            ));
            error!(node = %node_id, "{err}");
            return Err(err);
        };

        if config.mode.is_strict() && quarantine.contains(&node.action_ref, &node.schema_version) {
            let message = format!(
                "action {}:{} is quarantined in {} mode",
                node.action_ref, node.schema_version, config.mode
            );
            journal.append(&NodeResult::failure(
                node_id,
                &node.action_ref,
                &node.schema_version,
                &message,
            ));
            error!(node = %node_id, "{message}");
            return Err(RunError::NodeFailed {
                node_id: node_id.clone(),
                message,
            });
        }

        if config.dry_run {
            context.insert(node_id.clone(), json!({ "dryRun": true }));
            journal.append(&NodeResult::success(node_id, &node.action_ref, &node.schema_version));
            info!(node = %node_id, "dry-run placeholder recorded");
            continue;
        }

        let node_ctx = NodeContext {
            id: node.id.clone(),
            action_ref: node.action_ref.clone(),
            schema_version: node.schema_version.clone(),
        };

        match execute_node(node, &node_ctx, handler, &context, config.mode, config.debug_ref).await {
            Ok(output) => {
                journal.append(&NodeResult::success(node_id, &node.action_ref, &node.schema_version));
                info!(node = %node_id, "node succeeded");
                context.insert(node_id.clone(), output);
            }
            Err(message) => {
                journal.append(&NodeResult::failure(
                    node_id,
                    &node.action_ref,
                    &node.schema_version,
                    &message,
                ));
                error!(node = %node_id, "node failed: {message}");
                return Err(RunError::NodeFailed {
                    node_id: node_id.clone(),
                    message,
                });
            }
        }
    }

    journal.append(&WorkflowResult::success(&abs_path.display().to_string()));
    info!("workflow completed successfully");
    Ok(())
}
