//! Common test utilities for building graphs and running kinds in isolation.
use serde_json::{Value, json};
use textubes::prelude::*;

pub const TEST_SEED: u64 = 42;

/// The demo pipeline, written with a mix of native and React Flow field names.
#[allow(dead_code)]
pub const PIPELINE_JSON: &str = include_str!("../demos/pipeline.json");

/// A graph over the built-in kinds with a fixed random seed.
#[allow(dead_code)]
pub fn seeded_graph() -> Graph {
    Graph::builder().with_seed(TEST_SEED).build()
}

#[allow(dead_code)]
pub fn add(graph: &mut Graph, kind: &str, params: Value) -> NodeId {
    graph
        .add_node(kind, params_from(params))
        .expect("Failed to add node")
        .0
}

#[allow(dead_code)]
pub fn add_source(graph: &mut Graph, text: &str) -> NodeId {
    add(graph, "source", json!({ "value": text }))
}

/// Connects the default channel of `source` to `port` of `target`.
#[allow(dead_code)]
pub fn connect(graph: &mut Graph, source: &str, target: &str, port: &str) -> EdgeId {
    graph
        .add_edge(source, None, target, port)
        .expect("Failed to connect nodes")
        .0
}

#[allow(dead_code)]
pub fn connect_channel(
    graph: &mut Graph,
    source: &str,
    channel: &str,
    target: &str,
    port: &str,
) -> EdgeId {
    graph
        .add_edge(source, Some(channel), target, port)
        .expect("Failed to connect channel")
        .0
}

#[allow(dead_code)]
pub fn set_text(graph: &mut Graph, id: &str, text: &str) -> PassReport {
    set_param(graph, id, "value", json!(text))
}

#[allow(dead_code)]
pub fn set_param(graph: &mut Graph, id: &str, key: &str, value: Value) -> PassReport {
    let mut partial = Params::new();
    partial.insert(key.to_string(), value);
    graph
        .set_node_params(id, partial)
        .expect("Failed to set node params")
}

#[allow(dead_code)]
pub fn output(graph: &Graph, id: &str) -> String {
    graph.output(id).expect("Node should exist").to_string()
}

#[allow(dead_code)]
pub fn input_ports(graph: &Graph, id: &str) -> Vec<String> {
    let shape = graph.ports(id).expect("Node should exist");
    shape.input_ids().map(String::from).collect()
}

#[allow(dead_code)]
pub fn output_ports(graph: &Graph, id: &str) -> Vec<String> {
    let shape = graph.ports(id).expect("Node should exist");
    shape.output_ids().map(String::from).collect()
}

/// Evaluates a built-in kind directly against the given port values.
#[allow(dead_code)]
pub fn run(kind: &str, inputs: &[(&str, &str)], params: Value) -> Outputs {
    let registry = Registry::with_defaults();
    let transform = registry.get(kind).expect("Kind should be registered");
    let inputs = inputs
        .iter()
        .fold(Inputs::new(), |acc, (port, value)| acc.with(*port, *value));
    transform.evaluate(&inputs, &params_from(params))
}

/// Evaluates a single-input kind and returns its default channel.
#[allow(dead_code)]
pub fn run_value(kind: &str, input: &str, params: Value) -> String {
    run(kind, &[("input", input)], params)
        .get("value")
        .cloned()
        .unwrap_or_default()
}

/// Counts how often `id` was evaluated during a pass.
#[allow(dead_code)]
pub fn evaluation_count(report: &PassReport, id: &str) -> usize {
    report.evaluated.iter().filter(|n| *n == id).count()
}

/// A graph that grows forever once closed: `source -> concatenate -> repeat -> concatenate`.
/// Returns the graph and the ids of the concatenate and repeat nodes.
#[allow(dead_code)]
pub fn growing_loop(max_iterations: usize) -> (Graph, NodeId, NodeId) {
    let mut graph = Graph::builder()
        .with_seed(TEST_SEED)
        .with_max_iterations(max_iterations)
        .build();
    let src = add_source(&mut graph, "x");
    let concat = add(&mut graph, "concatenate", json!({}));
    let repeat = add(&mut graph, "repeat", json!({ "count": 2 }));
    connect(&mut graph, &src, &concat, "input-0");
    connect(&mut graph, &concat, &repeat, "input");
    (graph, concat, repeat)
}
