//! Dirty-set propagation.
//!
//! A pass starts from a set of dirty nodes and repeatedly evaluates one that no other dirty
//! node can reach, so every upstream source has settled before a node runs. A node whose
//! output did not change stops the wave there; a changed channel marks exactly the nodes it
//! feeds. The pass ends at a fixpoint or fails once re-evaluations pass the bound.

pub mod addressing;

pub use addressing::{gather_inputs, resolve_edge_value};

use crate::error::PropagationError;
use crate::graph::model::{Edge, GraphState, NodeId, Outputs, Params, single_output};
use crate::registry::{Inputs, PortShape, Registry, Transform};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// What one propagation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    /// Nodes in evaluation order. A node may appear more than once inside a cycle.
    pub evaluated: Vec<NodeId>,
    /// Nodes whose cached outputs changed, in commit order.
    pub committed: Vec<NodeId>,
    /// Edges removed because their port or channel no longer exists.
    pub pruned_edges: Vec<Edge>,
}

impl PassReport {
    pub fn evaluations(&self) -> usize {
        self.evaluated.len()
    }

    pub fn was_evaluated(&self, id: &str) -> bool {
        self.evaluated.iter().any(|n| n == id)
    }

    pub fn was_committed(&self, id: &str) -> bool {
        self.committed.iter().any(|n| n == id)
    }

    /// Position of `id` among evaluations, used to check ordering.
    pub fn evaluation_index(&self, id: &str) -> Option<usize> {
        self.evaluated.iter().position(|n| n == id)
    }
}

/// Runs one pass over `state` starting from `seeds`.
///
/// `max_iterations` bounds re-evaluations: the first evaluation of each node in a pass is
/// free, so an acyclic graph of any size settles. Only a cycle evaluates a node twice.
///
/// On error the state is left mid-pass; callers restore their own snapshot.
pub fn propagate<I>(
    state: &mut GraphState,
    registry: &Registry,
    max_iterations: usize,
    seeds: I,
) -> Result<PassReport, PropagationError>
where
    I: IntoIterator<Item = NodeId>,
{
    let mut dirty: AHashSet<NodeId> = seeds
        .into_iter()
        .filter(|id| state.contains_node(id))
        .collect();
    let mut report = PassReport::default();
    let mut visited: AHashSet<NodeId> = AHashSet::new();
    let mut reevaluations = 0;
    let mut adjacency = Adjacency::of(state);

    while let Some(node_id) = adjacency.next_ready(state, &dirty) {
        if !visited.insert(node_id.clone()) {
            reevaluations += 1;
            if reevaluations > max_iterations {
                warn!(bound = max_iterations, node = %node_id, "propagation did not settle");
                return Err(PropagationError::IterationBoundExceeded {
                    bound: max_iterations,
                    last_node_id: node_id,
                });
            }
        }

        dirty.remove(&node_id);
        let pruned = report.pruned_edges.len();
        let downstream = evaluate_node(state, registry, &node_id, &mut report);
        if report.pruned_edges.len() != pruned {
            adjacency = Adjacency::of(state);
        }
        dirty.extend(
            downstream
                .into_iter()
                .filter(|id| state.contains_node(id)),
        );
    }

    Ok(report)
}

/// Successor lists of every node. Edges are only ever removed during a pass, so the map is
/// rebuilt after pruning and otherwise lives for the whole pass.
struct Adjacency {
    successors: AHashMap<NodeId, Vec<NodeId>>,
}

impl Adjacency {
    fn of(state: &GraphState) -> Self {
        let mut successors: AHashMap<NodeId, Vec<NodeId>> = AHashMap::new();
        for edge in &state.edges {
            successors
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
        }
        Self { successors }
    }

    /// The first dirty node, in insertion order, that no dirty node reaches. When every dirty
    /// node is reachable (a cycle) the first dirty node is taken anyway.
    fn next_ready(&self, state: &GraphState, dirty: &AHashSet<NodeId>) -> Option<NodeId> {
        if dirty.is_empty() {
            return None;
        }
        let reachable = self.reachable_from(dirty);
        let mut pending = state.nodes.iter().filter(|n| dirty.contains(&n.id));
        let first = pending.clone().next();
        pending
            .find(|n| !reachable.contains(n.id.as_str()))
            .or(first)
            .map(|n| n.id.clone())
    }

    /// Every node reachable through at least one edge from a node in `from`.
    fn reachable_from(&self, from: &AHashSet<NodeId>) -> AHashSet<&str> {
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut queue: VecDeque<&str> = from
            .iter()
            .filter_map(|id| self.successors.get(id))
            .flatten()
            .map(String::as_str)
            .collect();
        while let Some(id) = queue.pop_front() {
            if seen.insert(id) {
                if let Some(next) = self.successors.get(id) {
                    queue.extend(next.iter().map(String::as_str));
                }
            }
        }
        seen
    }
}

/// Evaluates one node and commits its outputs if they changed. Returns the nodes that must
/// be re-evaluated as a consequence.
fn evaluate_node(
    state: &mut GraphState,
    registry: &Registry,
    node_id: &str,
    report: &mut PassReport,
) -> Vec<NodeId> {
    report.evaluated.push(node_id.to_string());
    let Some(node) = state.node(node_id) else {
        return Vec::new();
    };
    let kind = node.kind.clone();
    let params = node.params.clone();
    let mut downstream = Vec::new();

    let outputs = match registry.get(&kind) {
        Ok(transform) => {
            let (inputs, shape) = settle_ports(state, transform, node_id, &params, report);
            debug!(node = %node_id, kind = %kind, inputs = inputs.len(), "evaluating");
            let outputs = if !shape.inputs.is_empty() && inputs.is_empty() {
                transform.empty(&params)
            } else {
                transform.evaluate(&inputs, &params)
            };

            let vanished = state.take_edges(|e| e.source == node_id && !shape.has_output(e.channel()));
            for edge in vanished {
                debug!(edge = %edge.id, channel = %edge.channel(), "pruned edge on vanished channel");
                downstream.push(edge.target.clone());
                report.pruned_edges.push(edge);
            }
            outputs
        }
        Err(err) => {
            warn!(node = %node_id, error = %err, "node yields empty output");
            single_output("")
        }
    };

    let changed = changed_channels(state, node_id, &outputs);
    if changed.is_empty() {
        return downstream;
    }
    debug!(node = %node_id, channels = ?changed, "committed");
    downstream.extend(
        state
            .outgoing(node_id)
            .filter(|e| changed.contains(e.channel()))
            .map(|e| e.target.clone()),
    );
    if let Some(node) = state.node_mut(node_id) {
        node.outputs = outputs;
    }
    report.committed.push(node_id.to_string());
    downstream
}

/// Resolves the node's ports against its current inputs, pruning incoming edges on ports
/// that no longer exist until the shape is stable.
fn settle_ports(
    state: &mut GraphState,
    transform: &dyn Transform,
    node_id: &str,
    params: &Params,
    report: &mut PassReport,
) -> (Inputs, PortShape) {
    loop {
        let inputs = gather_inputs(state, node_id);
        let shape = transform.resolve_ports(params, &inputs);
        let stale = state.take_edges(|e| e.target == node_id && !shape.has_input(&e.target_port));
        if stale.is_empty() {
            return (inputs, shape);
        }
        for edge in stale {
            debug!(edge = %edge.id, port = %edge.target_port, "pruned edge on vanished port");
            report.pruned_edges.push(edge);
        }
    }
}

/// Channels whose value differs from the cache, including cached channels that vanished.
fn changed_channels(state: &GraphState, node_id: &str, outputs: &Outputs) -> AHashSet<String> {
    let Some(cached) = state.node(node_id).map(|n| &n.outputs) else {
        return AHashSet::new();
    };
    outputs
        .iter()
        .filter(|(channel, value)| cached.get(*channel) != Some(*value))
        .map(|(channel, _)| channel.clone())
        .chain(
            cached
                .keys()
                .filter(|channel| !outputs.contains_key(*channel))
                .cloned(),
        )
        .collect()
}
