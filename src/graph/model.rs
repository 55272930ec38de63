use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub type NodeId = String;
pub type EdgeId = String;

/// User-editable configuration of a node, plus engine-private `_`-prefixed fields.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Cached output values of a node, keyed by channel name.
pub type Outputs = BTreeMap<String, String>;

/// The channel read when an edge does not name one.
pub const DEFAULT_CHANNEL: &str = "value";

/// The port id of kinds with a single static input.
pub const DEFAULT_INPUT: &str = "input";

/// Ceiling applied to every count-like param (`count`, `length`, `padLength`, ...).
pub const MAX_COUNT_PARAM: usize = 100_000;

/// Largest output, in bytes, a kind builds by repeating its input.
pub const MAX_REPEAT_BYTES: usize = 1 << 20;

/// Monotonic token bumped by every explicit regenerate request.
pub const REGENERATE_PARAM: &str = "_regenerate";

/// Seed from which regenerative kinds derive all of their randomness.
pub const SEED_PARAM: &str = "_seed";

/// An instance of a transform kind in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default, alias = "data")]
    pub params: Params,
    #[serde(default, rename = "cachedOutputs", alias = "outputs")]
    pub outputs: Outputs,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: impl Into<String>, params: Params) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            params,
            outputs: Outputs::new(),
        }
    }

    /// The cached value of the default channel, or `""` when nothing was committed yet.
    pub fn value(&self) -> &str {
        self.outputs
            .get(DEFAULT_CHANNEL)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A directed connection from an output channel to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    #[serde(rename = "sourceNodeId", alias = "source")]
    pub source: NodeId,
    #[serde(default, alias = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_channel: Option<String>,
    #[serde(rename = "targetNodeId", alias = "target")]
    pub target: NodeId,
    #[serde(
        default = "default_target_port",
        alias = "targetHandle",
        deserialize_with = "port_or_default"
    )]
    pub target_port: String,
}

impl Edge {
    /// The channel this edge reads, with the default channel filled in.
    pub fn channel(&self) -> &str {
        self.source_channel.as_deref().unwrap_or(DEFAULT_CHANNEL)
    }

    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        source_channel: Option<&str>,
        target: impl Into<NodeId>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_channel: source_channel.map(str::to_string),
            target: target.into(),
            target_port: target_port.into(),
        }
    }
}

/// The mutable contents of a graph: nodes in insertion order and the edges between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphState {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphState {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Edges terminating at `target`.
    pub fn incoming<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == target)
    }

    /// Edges starting at `source`.
    pub fn outgoing<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == source)
    }

    /// The unique edge feeding `(target, port)`, if any.
    pub fn edge_into(&self, target: &str, port: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.target == target && e.target_port == port)
    }

    /// Removes and returns every edge matching `predicate`.
    pub fn take_edges(&mut self, mut predicate: impl FnMut(&Edge) -> bool) -> Vec<Edge> {
        let (taken, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| predicate(e));
        self.edges = kept;
        taken
    }
}

fn default_target_port() -> String {
    DEFAULT_INPUT.to_string()
}

// React Flow stores `null` for a node's unnamed handle.
fn port_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_target_port))
}

/// Builds a parameter map from a JSON object literal. Non-objects yield an empty map.
pub fn params_from(value: serde_json::Value) -> Params {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Builds an output map holding only the default channel.
pub fn single_output(value: impl Into<String>) -> Outputs {
    Outputs::from([(DEFAULT_CHANNEL.to_string(), value.into())])
}

pub fn is_private_param(key: &str) -> bool {
    key.starts_with('_')
}

/// Reads a string parameter, falling back to `default` when absent or not a string.
pub fn param_str<'a>(params: &'a Params, key: &str, default: &'a str) -> &'a str {
    params.get(key).and_then(|v| v.as_str()).unwrap_or(default)
}

/// Reads a non-negative integer parameter, clamped to [`MAX_COUNT_PARAM`]. Numeric strings
/// are accepted, since form inputs often arrive as text.
pub fn param_usize(params: &Params, key: &str, default: usize) -> usize {
    let value = match params.get(key) {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .map(|v| usize::try_from(v).unwrap_or(usize::MAX))
            .or_else(|| n.as_i64().map(|v| v.max(0) as usize))
            .or_else(|| n.as_f64().map(|v| v.max(0.0) as usize))
            .unwrap_or(default),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    };
    value.min(MAX_COUNT_PARAM)
}

/// Reads a signed integer parameter.
pub fn param_i64(params: &Params, key: &str, default: i64) -> i64 {
    match params.get(key) {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v as i64))
            .unwrap_or(default),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn param_u64(params: &Params, key: &str) -> Option<u64> {
    params.get(key).and_then(|v| v.as_u64())
}
