//! Tests for port resolution: variadic inputs, content-driven outputs and template tokens.
mod common;
use common::*;
use serde_json::json;
use textubes::prelude::*;

#[test]
fn test_static_shapes() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "a");
    let caps = add(&mut graph, "capslock", json!({}));
    let result = add(&mut graph, "result", json!({}));

    assert!(input_ports(&graph, &src).is_empty());
    assert_eq!(output_ports(&graph, &src), vec!["value"]);
    assert_eq!(input_ports(&graph, &caps), vec!["input"]);
    assert_eq!(output_ports(&graph, &caps), vec!["value"]);
    assert_eq!(input_ports(&graph, &result), vec!["input"]);
    assert!(output_ports(&graph, &result).is_empty());

    let shape = graph.ports(&caps).expect("Node should exist");
    assert!(shape.inputs.iter().all(|p| !p.is_dynamic));
    assert!(shape.inputs.iter().all(|p| p.direction == Direction::Input));
}

#[test]
fn test_ports_of_missing_node() {
    let graph = seeded_graph();
    assert_eq!(
        graph.ports("ghost"),
        Err(GraphError::NodeNotFound("ghost".to_string()))
    );
}

#[test]
fn test_variadic_inputs_grow_with_connections() {
    let mut graph = seeded_graph();
    let concat = add(&mut graph, "concatenate", json!({}));
    let sources: Vec<NodeId> = ["a", "b", "c"]
        .iter()
        .map(|t| add_source(&mut graph, t))
        .collect();

    assert_eq!(input_ports(&graph, &concat), vec!["input-0", "input-1"]);

    connect(&mut graph, &sources[0], &concat, "input-0");
    assert_eq!(input_ports(&graph, &concat).len(), 2);

    connect(&mut graph, &sources[1], &concat, "input-1");
    assert_eq!(
        input_ports(&graph, &concat),
        vec!["input-0", "input-1", "input-2"]
    );

    connect(&mut graph, &sources[2], &concat, "input-2");
    assert_eq!(input_ports(&graph, &concat).len(), 4);
    assert_eq!(output(&graph, &concat), "abc");

    let shape = graph.ports(&concat).expect("Node should exist");
    assert!(shape.inputs.iter().all(|p| p.is_dynamic));
}

#[test]
fn test_variadic_inputs_shrink_but_keep_two() {
    let mut graph = seeded_graph();
    let concat = add(&mut graph, "concatenate", json!({}));
    let mut edges = Vec::new();
    for (i, text) in ["a", "b", "c"].iter().enumerate() {
        let src = add_source(&mut graph, text);
        edges.push(connect(&mut graph, &src, &concat, &format!("input-{}", i)));
    }

    graph.remove_edge(&edges[2]).expect("Failed to remove edge");
    assert_eq!(input_ports(&graph, &concat).len(), 3);
    assert_eq!(output(&graph, &concat), "ab");

    graph.remove_edge(&edges[1]).expect("Failed to remove edge");
    assert_eq!(input_ports(&graph, &concat).len(), 2);

    graph.remove_edge(&edges[0]).expect("Failed to remove edge");
    assert_eq!(input_ports(&graph, &concat), vec!["input-0", "input-1"]);
    assert_eq!(output(&graph, &concat), "");
}

#[test]
fn test_variadic_inputs_join_in_port_order() {
    let mut graph = seeded_graph();
    let concat = add(&mut graph, "concatenate", json!({ "separator": "-" }));
    let a = add_source(&mut graph, "a");
    let b = add_source(&mut graph, "b");

    // Connecting out of order still joins by port index, skipping the gap.
    connect(&mut graph, &b, &concat, "input-1");
    assert_eq!(input_ports(&graph, &concat).len(), 3);
    assert_eq!(output(&graph, &concat), "b");

    connect(&mut graph, &a, &concat, "input-0");
    assert_eq!(output(&graph, &concat), "a-b");
}

#[test]
fn test_variadic_gap_keeps_highest_edge() {
    let mut graph = seeded_graph();
    let concat = add(&mut graph, "concatenate", json!({}));
    let sources: Vec<NodeId> = ["a", "b", "c"]
        .iter()
        .map(|text| add_source(&mut graph, text))
        .collect();
    let edges: Vec<EdgeId> = sources
        .iter()
        .enumerate()
        .map(|(i, src)| connect(&mut graph, src, &concat, &format!("input-{i}")))
        .collect();

    let report = graph.remove_edge(&edges[1]).expect("Failed to remove edge");

    // Two ports stay connected, but the shape still reaches past input-2.
    assert_eq!(input_ports(&graph, &concat).len(), 4);
    assert!(report.pruned_edges.is_empty());
    assert!(graph.edge(&edges[2]).is_some());
    assert_eq!(output(&graph, &concat), "ac");
}

#[test]
fn test_split_channels_follow_content() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "a\nb\nc");
    let split = add(&mut graph, "split", json!({}));
    connect(&mut graph, &src, &split, "input");
    assert_eq!(
        output_ports(&graph, &split),
        vec!["output-0", "output-1", "output-2"]
    );

    let targets: Vec<NodeId> = (0..3)
        .map(|i| {
            let caps = add(&mut graph, "capslock", json!({}));
            connect_channel(&mut graph, &split, &format!("output-{}", i), &caps, "input");
            caps
        })
        .collect();
    let third_edge = graph
        .edge_into(&targets[2], "input")
        .expect("Third channel is connected")
        .id
        .clone();
    assert_eq!(output(&graph, &targets[2]), "C");

    let report = set_text(&mut graph, &src, "a\nb");

    assert_eq!(output_ports(&graph, &split), vec!["output-0", "output-1"]);
    assert_eq!(report.pruned_edges.len(), 1);
    assert_eq!(report.pruned_edges[0].id, third_edge);
    assert!(graph.edge_into(&targets[0], "input").is_some());
    assert!(graph.edge_into(&targets[1], "input").is_some());
    assert_eq!(output(&graph, &targets[0]), "A");
    assert_eq!(output(&graph, &targets[1]), "B");
    assert_eq!(output(&graph, &targets[2]), "");
    assert!(!graph.outputs(&split).expect("Node should exist").contains_key("output-2"));
}

#[test]
fn test_split_modes_change_channel_count() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "x,y\nz");
    let split = add(&mut graph, "split", json!({}));
    connect(&mut graph, &src, &split, "input");
    assert_eq!(output_ports(&graph, &split).len(), 2);

    set_param(&mut graph, &split, "mode", json!("delimiter"));
    assert_eq!(output_ports(&graph, &split).len(), 2);
    assert_eq!(
        graph.outputs(&split).expect("Node should exist")["output-1"],
        "y\nz"
    );

    set_param(&mut graph, &split, "mode", json!("character"));
    assert_eq!(output_ports(&graph, &split).len(), 5);
}

#[test]
fn test_template_tokens_follow_template_text() {
    let mut graph = seeded_graph();
    let text = add_source(&mut graph, "Hi %%NAME%%");
    let template = add(&mut graph, "template", json!({}));
    assert_eq!(input_ports(&graph, &template), vec!["template"]);

    connect(&mut graph, &text, &template, "template");
    assert_eq!(input_ports(&graph, &template), vec!["template", "token-NAME"]);
    assert_eq!(output(&graph, &template), "Hi %%NAME%%");

    // Duplicates collapse; new tokens appear in first-occurrence order.
    set_text(&mut graph, &text, "%%B%% and %%A%% and %%B%%");
    assert_eq!(
        input_ports(&graph, &template),
        vec!["template", "token-B", "token-A"]
    );
}

#[test]
fn test_template_fills_connected_tokens() {
    let mut graph = seeded_graph();
    let text = add_source(&mut graph, "%%A%% meets %%B%%, %%A%%!");
    let name = add_source(&mut graph, "Ada");
    let template = add(&mut graph, "template", json!({}));
    connect(&mut graph, &text, &template, "template");
    connect(&mut graph, &name, &template, "token-A");

    assert_eq!(output(&graph, &template), "Ada meets %%B%%, Ada!");

    set_text(&mut graph, &name, "Grace");
    assert_eq!(output(&graph, &template), "Grace meets %%B%%, Grace!");
}

#[test]
fn test_removing_marker_prunes_its_edge() {
    let mut graph = seeded_graph();
    let text = add_source(&mut graph, "%%A%% %%B%%");
    let a = add_source(&mut graph, "1");
    let b = add_source(&mut graph, "2");
    let template = add(&mut graph, "template", json!({}));
    connect(&mut graph, &text, &template, "template");
    let to_a = connect(&mut graph, &a, &template, "token-A");
    connect(&mut graph, &b, &template, "token-B");
    assert_eq!(output(&graph, &template), "1 2");

    let report = set_text(&mut graph, &text, "only %%B%%");

    assert_eq!(input_ports(&graph, &template), vec!["template", "token-B"]);
    assert!(graph.edge(&to_a).is_none());
    assert_eq!(report.pruned_edges.len(), 1);
    assert_eq!(output(&graph, &template), "only 2");
}

#[test]
fn test_template_without_template_input_is_empty() {
    let mut graph = seeded_graph();
    let template = add(&mut graph, "template", json!({}));
    assert_eq!(output(&graph, &template), "");
}

#[test]
fn test_resolution_never_touches_params() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "a,b");
    let split = add(&mut graph, "split", json!({ "mode": "delimiter" }));
    connect(&mut graph, &src, &split, "input");
    let before = graph.node(&split).expect("Node should exist").params.clone();

    let first = graph.ports(&split).expect("Node should exist");
    let second = graph.ports(&split).expect("Node should exist");

    assert_eq!(first, second);
    assert_eq!(graph.node(&split).expect("Node should exist").params, before);
}
