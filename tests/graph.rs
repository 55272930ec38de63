//! Tests for graph store operations: node lifecycle, connections and rollback.
mod common;
use common::*;
use serde_json::json;
use textubes::prelude::*;

#[test]
fn test_add_node_starts_from_kind_defaults() {
    let mut graph = seeded_graph();
    let id = add(&mut graph, "repeat", json!({}));

    let node = graph.node(&id).expect("Node should exist");
    assert!(id.starts_with("repeat-"));
    assert_eq!(node.params["count"], json!(3));
    // An unconnected transformer caches its empty value.
    assert_eq!(output(&graph, &id), "");
}

#[test]
fn test_add_node_overlays_initial_params() {
    let mut graph = seeded_graph();
    let id = add(&mut graph, "trimpad", json!({ "mode": "padEnd", "padChar": "." }));

    let params = &graph.node(&id).expect("Node should exist").params;
    assert_eq!(params["mode"], json!("padEnd"));
    assert_eq!(params["padChar"], json!("."));
    assert_eq!(params["padLength"], json!(10));
}

#[test]
fn test_add_node_allocates_unique_ids() {
    let mut graph = seeded_graph();
    let a = add_source(&mut graph, "a");
    let b = add_source(&mut graph, "b");

    assert_ne!(a, b);
    assert_eq!(graph.nodes().len(), 2);
}

#[test]
fn test_add_node_rejects_unknown_kind() {
    let mut graph = seeded_graph();
    let err = graph
        .add_node("mystery", Params::new())
        .expect_err("Unknown kinds should be rejected");

    assert_eq!(
        err,
        GraphError::Registry(RegistryError::UnknownKind("mystery".to_string()))
    );
    assert!(graph.nodes().is_empty());
}

#[test]
fn test_regenerative_nodes_get_a_seed_at_creation() {
    let mut graph = seeded_graph();
    let id = add(&mut graph, "random", json!({}));

    let params = &graph.node(&id).expect("Node should exist").params;
    assert!(params["_seed"].is_u64());
    assert_eq!(params["_regenerate"], json!(0));
    assert_eq!(output(&graph, &id).chars().count(), 10);

    // Deterministic kinds carry no private state.
    let caps = add(&mut graph, "capslock", json!({}));
    let params = &graph.node(&caps).expect("Node should exist").params;
    assert!(!params.contains_key("_seed"));
}

#[test]
fn test_remove_node_cascades_to_edges() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "hello");
    let caps = add(&mut graph, "capslock", json!({}));
    let result = add(&mut graph, "result", json!({}));
    connect(&mut graph, &src, &caps, "input");
    connect(&mut graph, &caps, &result, "input");
    assert_eq!(output(&graph, &result), "HELLO");

    let report = graph.remove_node(&caps).expect("Failed to remove node");

    assert!(graph.node(&caps).is_none());
    assert!(graph.edges().is_empty());
    assert_eq!(output(&graph, &result), "");
    assert!(report.was_committed(&result));
}

#[test]
fn test_remove_missing_node_fails() {
    let mut graph = seeded_graph();
    assert_eq!(
        graph.remove_node("ghost"),
        Err(GraphError::NodeNotFound("ghost".to_string()))
    );
}

#[test]
fn test_set_node_params_ignores_private_keys() {
    let mut graph = seeded_graph();
    let id = add(&mut graph, "random", json!({}));
    let seed = graph.node(&id).expect("Node should exist").params["_seed"].clone();
    let before = output(&graph, &id);

    let report = graph
        .set_node_params(&id, params_from(json!({ "_seed": 7, "length": 4 })))
        .expect("Failed to set params");

    let params = &graph.node(&id).expect("Node should exist").params;
    assert_eq!(params["_seed"], seed);
    assert_eq!(params["length"], json!(4));
    // Same seed, shorter draw: the output is a prefix of the previous one.
    assert_eq!(output(&graph, &id), before.chars().take(4).collect::<String>());
    assert!(report.was_committed(&id));
}

#[test]
fn test_add_edge_rejects_missing_nodes() {
    let mut graph = seeded_graph();
    let caps = add(&mut graph, "capslock", json!({}));

    assert_eq!(
        graph.add_edge("ghost", None, &caps, "input"),
        Err(GraphError::NodeNotFound("ghost".to_string()))
    );
    assert_eq!(
        graph.add_edge(&caps, None, "ghost", "input"),
        Err(GraphError::NodeNotFound("ghost".to_string()))
    );
}

#[test]
fn test_add_edge_rejects_missing_port() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "a");
    let caps = add(&mut graph, "capslock", json!({}));

    let err = graph
        .add_edge(&src, None, &caps, "token-NAME")
        .expect_err("Port does not exist");

    assert!(matches!(
        err,
        GraphError::InvalidConnection { ref target_port, .. } if target_port == "token-NAME"
    ));
    assert!(graph.edges().is_empty());
}

#[test]
fn test_add_edge_rejects_self_loop() {
    let mut graph = seeded_graph();
    let caps = add(&mut graph, "capslock", json!({}));

    assert_eq!(
        graph.add_edge(&caps, None, &caps, "input"),
        Err(GraphError::SelfLoop(caps.clone()))
    );
}

#[test]
fn test_add_edge_rejects_unknown_channel() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "a");
    let caps = add(&mut graph, "capslock", json!({}));

    let err = graph
        .add_edge(&src, Some("output-3"), &caps, "input")
        .expect_err("Channel does not exist");
    assert!(matches!(err, GraphError::InvalidConnection { .. }));
}

#[test]
fn test_add_edge_requires_channel_on_multi_output_kind() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "a\nb");
    let split = add(&mut graph, "split", json!({}));
    let caps = add(&mut graph, "capslock", json!({}));
    connect(&mut graph, &src, &split, "input");

    let err = graph
        .add_edge(&split, None, &caps, "input")
        .expect_err("Split has no default channel");
    assert!(matches!(err, GraphError::InvalidConnection { .. }));

    connect_channel(&mut graph, &split, "output-1", &caps, "input");
    assert_eq!(output(&graph, &caps), "B");
}

#[test]
fn test_add_edge_supersedes_edge_on_same_port() {
    let mut graph = seeded_graph();
    let a = add_source(&mut graph, "first");
    let b = add_source(&mut graph, "second");
    let caps = add(&mut graph, "capslock", json!({}));

    connect(&mut graph, &a, &caps, "input");
    let second = connect(&mut graph, &b, &caps, "input");

    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edges()[0].id, second);
    assert_eq!(output(&graph, &caps), "SECOND");
}

#[test]
fn test_fan_out_from_one_channel() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "abc");
    let caps = add(&mut graph, "capslock", json!({}));
    let rev = add(&mut graph, "reverse", json!({}));
    connect(&mut graph, &src, &caps, "input");
    connect(&mut graph, &src, &rev, "input");

    assert_eq!(output(&graph, &caps), "ABC");
    assert_eq!(output(&graph, &rev), "cba");
}

#[test]
fn test_remove_edge_resets_target() {
    let mut graph = seeded_graph();
    let src = add_source(&mut graph, "abc");
    let caps = add(&mut graph, "capslock", json!({}));
    let edge = connect(&mut graph, &src, &caps, "input");

    graph.remove_edge(&edge).expect("Failed to remove edge");

    assert!(graph.edges().is_empty());
    assert_eq!(output(&graph, &caps), "");
    assert_eq!(
        graph.remove_edge(&edge),
        Err(GraphError::EdgeNotFound(edge.clone()))
    );
}

#[test]
fn test_reconnect_edge_moves_endpoints() {
    let mut graph = seeded_graph();
    let a = add_source(&mut graph, "from a");
    let b = add_source(&mut graph, "from b");
    let caps = add(&mut graph, "capslock", json!({}));
    let edge = connect(&mut graph, &a, &caps, "input");

    graph
        .reconnect_edge(&edge, &b, None, &caps, "input")
        .expect("Failed to reconnect");

    let moved = graph.edge(&edge).expect("Edge keeps its id");
    assert_eq!(moved.source, b);
    assert_eq!(output(&graph, &caps), "FROM B");
}

#[test]
fn test_rejected_reconnect_keeps_original_edge() {
    let mut graph = seeded_graph();
    let a = add_source(&mut graph, "stay");
    let caps = add(&mut graph, "capslock", json!({}));
    let edge = connect(&mut graph, &a, &caps, "input");

    let err = graph
        .reconnect_edge(&edge, &a, None, &caps, "nowhere")
        .expect_err("Port does not exist");

    assert!(matches!(err, GraphError::InvalidConnection { .. }));
    assert_eq!(graph.edge(&edge).expect("Edge still exists").source, a);
    assert_eq!(output(&graph, &caps), "STAY");
}

#[test]
fn test_non_terminating_cycle_rolls_back() {
    let (mut graph, concat, repeat) = growing_loop(20);
    let before = graph.export();
    assert_eq!(output(&graph, &repeat), "xx");

    let err = graph
        .add_edge(&repeat, None, &concat, "input-1")
        .expect_err("The loop never settles");

    assert!(matches!(
        err,
        GraphError::Propagation(PropagationError::IterationBoundExceeded { bound: 20, .. })
    ));
    assert_eq!(graph.export(), before);
    assert_eq!(output(&graph, &concat), "x");
}

#[test]
fn test_converging_cycle_is_allowed_by_default() {
    let mut graph = seeded_graph();
    let a = add(&mut graph, "capslock", json!({}));
    let b = add(&mut graph, "capslock", json!({}));
    connect(&mut graph, &a, &b, "input");

    graph
        .add_edge(&b, None, &a, "input")
        .expect("A loop that settles is accepted");
    assert_eq!(graph.edges().len(), 2);
}

#[test]
fn test_reject_cycles_configuration() {
    let config = EngineConfig {
        reject_cycles: true,
        ..EngineConfig::default()
    };
    let mut graph = Graph::builder().with_config(config).with_seed(TEST_SEED).build();
    let a = add(&mut graph, "capslock", json!({}));
    let b = add(&mut graph, "reverse", json!({}));
    let c = add(&mut graph, "rot13", json!({}));
    connect(&mut graph, &a, &b, "input");
    connect(&mut graph, &b, &c, "input");

    assert_eq!(
        graph.add_edge(&c, None, &a, "input"),
        Err(GraphError::CycleDetected {
            source_node_id: c.clone(),
            target_node_id: a.clone(),
        })
    );
    assert_eq!(graph.edges().len(), 2);
}

#[test]
fn test_regenerate_rejects_deterministic_kind() {
    let mut graph = seeded_graph();
    let caps = add(&mut graph, "capslock", json!({}));

    assert_eq!(
        graph.regenerate(&caps),
        Err(GraphError::NotRegenerative {
            node_id: caps.clone(),
            kind: "capslock".to_string(),
        })
    );
}

#[test]
fn test_catalog_lists_every_kind_by_category() {
    let graph = seeded_graph();
    let catalog = graph.catalog();

    assert_eq!(catalog.len(), graph.registry().len());
    assert_eq!(catalog[0].category, Category::Source);
    assert_eq!(catalog.last().expect("Catalog is not empty").kind, "result");
    assert!(catalog.windows(2).all(|w| w[0].category <= w[1].category));

    let shuffle = catalog
        .iter()
        .find(|e| e.kind == "shuffle")
        .expect("Shuffle is built in");
    assert_eq!(shuffle.behavior, Behavior::Regenerative);
}

#[test]
fn test_engine_config_from_json() {
    let config = EngineConfig::from_json(r#"{ "maxIterations": 50, "seed": 9 }"#)
        .expect("Failed to parse config");

    assert_eq!(config.max_iterations, 50);
    assert_eq!(config.seed, Some(9));
    assert!(!config.reject_cycles);
    assert!(EngineConfig::from_json("{ nope").is_err());
}
