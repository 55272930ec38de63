//! Reads the values arriving on a node's input ports from its sources' caches.

use crate::graph::model::{Edge, GraphState};
use crate::registry::Inputs;

/// The value an edge carries: its source's cached `channel`, or `""` when the source or
/// channel no longer exists. There is no fallback to another channel.
pub fn resolve_edge_value<'a>(state: &'a GraphState, edge: &Edge) -> &'a str {
    state
        .node(&edge.source)
        .and_then(|source| source.outputs.get(edge.channel()))
        .map(String::as_str)
        .unwrap_or("")
}

/// Collects the values on every connected input port of `node_id`.
pub fn gather_inputs(state: &GraphState, node_id: &str) -> Inputs {
    let mut inputs = Inputs::new();
    for edge in state.incoming(node_id) {
        inputs.insert(edge.target_port.as_str(), resolve_edge_value(state, edge));
    }
    inputs
}
