//! The persisted form of a graph and its validation on import.

use super::model::{Edge, GraphState, Node};
use crate::error::SnapshotError;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const SNAPSHOT_VERSION: u32 = 1;

/// The literal contents of a graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default = "current_version")]
    pub version: u32,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

impl GraphSnapshot {
    pub fn from_state(state: &GraphState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            nodes: state.nodes.clone(),
            edges: state.edges.clone(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| SnapshotError::JsonParseError(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validates a graph document.
    ///
    /// The document must be an object whose `nodes` and `edges` fields are arrays, and node
    /// ids must be unique. Edges that reference missing nodes are dropped, and when several
    /// edges feed the same input port only the last one is kept.
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let Value::Object(mut document) = value else {
            return Err(SnapshotError::NotAnObject);
        };
        let nodes = take_array(&mut document, "nodes")?;
        let edges = take_array(&mut document, "edges")?;
        let version = document
            .get("version")
            .and_then(Value::as_u64)
            .map_or(SNAPSHOT_VERSION, |v| v as u32);
        if version != SNAPSHOT_VERSION {
            warn!(version, expected = SNAPSHOT_VERSION, "importing graph document of another version");
        }

        let nodes: Vec<Node> = nodes
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                serde_json::from_value(n)
                    .map_err(|e| SnapshotError::Malformed(format!("node {}: {}", i, e)))
            })
            .collect::<Result<_, _>>()?;
        let mut ids: AHashSet<&str> = AHashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(SnapshotError::DuplicateNode(node.id.clone()));
            }
        }

        let mut kept: Vec<Edge> = Vec::with_capacity(edges.len());
        let mut by_port: AHashMap<(String, String), usize> = AHashMap::new();
        for (i, raw) in edges.into_iter().enumerate() {
            let edge: Edge = serde_json::from_value(raw)
                .map_err(|e| SnapshotError::Malformed(format!("edge {}: {}", i, e)))?;
            if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
                warn!(edge = %edge.id, source = %edge.source, target = %edge.target, "dropping edge to missing node");
                continue;
            }
            let port = (edge.target.clone(), edge.target_port.clone());
            match by_port.get(&port) {
                Some(&slot) => {
                    warn!(edge = %kept[slot].id, replaced_by = %edge.id, "dropping superseded edge");
                    kept[slot] = edge;
                }
                None => {
                    by_port.insert(port, kept.len());
                    kept.push(edge);
                }
            }
        }

        Ok(Self {
            version,
            nodes,
            edges: kept,
        })
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Malformed(e.to_string()))
    }

    pub fn into_state(self) -> GraphState {
        GraphState {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

fn take_array(
    document: &mut serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Vec<Value>, SnapshotError> {
    match document.remove(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(SnapshotError::NotAnArray(field)),
        None => Err(SnapshotError::MissingField(field)),
    }
}
