//! Graph validator and topological sorter (`spec` §4.2).
//!
//! Checks node-id uniqueness and `dependsOn` existence, then runs Kahn's
//! algorithm: seed a FIFO queue with every zero-in-degree node in IR order,
//! repeatedly pop the head, decrement its dependents' in-degree (visited in
//! IR order so ties among nodes that become ready from the *same* pop are
//! broken correctly), and enqueue any that reach zero. Nodes still at
//! positive in-degree once the queue drains participate in a cycle.
//!
//! The FIFO discipline is what makes the ordering deterministic and
//! reproducible: a node's place in the output depends on *when* it becomes
//! ready relative to everything else, not just its static position in the
//! IR. A priority structure keyed purely by IR position would incorrectly
//! let a node that was ready from the start jump behind nodes that only
//! become ready later just because of where it sits in the file.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::DagError;
use crate::models::Workflow;

/// Validate the workflow's graph shape and return nodes in topological order.
///
/// # Errors
/// - [`DagError::DuplicateNodeId`] if two nodes share an id.
/// - [`DagError::UnknownDependency`] if a `dependsOn` entry names a missing node.
/// - [`DagError::Cycle`] if the graph isn't acyclic.
pub fn topo_sort(workflow: &Workflow) -> Result<Vec<String>, DagError> {
    let mut seen_ids: HashSet<&str> = HashSet::new();
    for node in &workflow.nodes {
        if !seen_ids.insert(node.id.as_str()) {
            return Err(DagError::DuplicateNodeId(node.id.clone()));
        }
    }

    let id_set: HashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();
    for node in &workflow.nodes {
        for dep in &node.depends_on {
            if !id_set.contains(dep.as_str()) {
                return Err(DagError::UnknownDependency {
                    node_id: node.id.clone(),
                    depends_on: dep.clone(),
                });
            }
        }
    }

    let mut in_degree: HashMap<&str, usize> = workflow
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.depends_on.len()))
        .collect();

    // Dependents lists are built by a single IR-order pass, so each node's
    // own dependents vector is already in IR order.
    let mut dependents: HashMap<&str, Vec<&str>> = workflow
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), Vec::new()))
        .collect();
    for node in &workflow.nodes {
        for dep in &node.depends_on {
            dependents.get_mut(dep.as_str()).unwrap().push(node.id.as_str());
        }
    }

    let mut queue: VecDeque<&str> = VecDeque::new();
    for node in &workflow.nodes {
        if in_degree[node.id.as_str()] == 0 {
            queue.push_back(node.id.as_str());
        }
    }

    let mut order: Vec<String> = Vec::with_capacity(workflow.nodes.len());
    while let Some(id) = queue.pop_front() {
        order.push(id.to_string());
        for &dependent in &dependents[id] {
            let degree = in_degree.get_mut(dependent).unwrap();
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != workflow.nodes.len() {
        let cyclic_ids: Vec<String> = workflow
            .nodes
            .iter()
            .filter(|n| in_degree[n.id.as_str()] > 0)
            .map(|n| n.id.clone())
            .collect();
        return Err(DagError::Cycle(cyclic_ids));
    }

    Ok(order)
}
