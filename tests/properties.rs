//! Property tests for propagation invariants.
mod common;
use common::*;
use proptest::prelude::*;
use serde_json::json;
use textubes::prelude::*;
use textubes::registry::kinds::split_parts;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn refresh_after_edit_commits_nothing(texts in prop::collection::vec(".{0,12}", 1..6)) {
        let mut graph = seeded_graph();
        let src = add_source(&mut graph, "");
        let upper = add(&mut graph, "capslock", json!({}));
        let boxed = add(&mut graph, "box", json!({}));
        let out = add(&mut graph, "result", json!({}));
        connect(&mut graph, &src, &upper, "input");
        connect(&mut graph, &upper, &boxed, "input");
        connect(&mut graph, &boxed, &out, "input");

        for text in &texts {
            set_text(&mut graph, &src, text);
            let report = graph.refresh().expect("Refresh should succeed");
            prop_assert!(report.committed.is_empty());
        }
        let last = texts.last().expect("At least one text");
        prop_assert_eq!(output(&graph, &upper), last.to_uppercase());
    }

    #[test]
    fn split_exposes_one_port_per_part(text in "[a-c\n,]{0,16}", mode in prop::sample::select(vec!["line", "character", "delimiter"])) {
        let mut graph = seeded_graph();
        let src = add_source(&mut graph, &text);
        let split = add(&mut graph, "split", json!({ "mode": mode }));
        connect(&mut graph, &src, &split, "input");

        let node = graph.node(&split).expect("Split should exist");
        let expected = split_parts(&text, &node.params).len();
        prop_assert_eq!(output_ports(&graph, &split).len(), expected);
        prop_assert_eq!(graph.outputs(&split).expect("Split should exist").len(), expected);
    }

    #[test]
    fn each_port_has_at_most_one_edge(picks in prop::collection::vec(0usize..4, 1..12)) {
        let mut graph = seeded_graph();
        let sources: Vec<NodeId> = (0..4)
            .map(|i| add_source(&mut graph, &format!("s{i}")))
            .collect();
        let upper = add(&mut graph, "capslock", json!({}));

        for pick in &picks {
            connect(&mut graph, &sources[*pick], &upper, "input");
        }

        let incoming = graph.edges().iter().filter(|e| e.target == upper).count();
        prop_assert_eq!(incoming, 1);
        let last = picks.last().expect("At least one pick");
        prop_assert_eq!(output(&graph, &upper), format!("S{last}"));
    }

    #[test]
    fn random_output_survives_unrelated_edits(texts in prop::collection::vec("[a-z]{0,8}", 1..5)) {
        let mut graph = seeded_graph();
        let random = add(&mut graph, "random", json!({ "length": 16 }));
        let src = add_source(&mut graph, "");
        let concat = add(&mut graph, "concatenate", json!({}));
        connect(&mut graph, &random, &concat, "input-0");
        connect(&mut graph, &src, &concat, "input-1");
        let before = output(&graph, &random);

        for text in &texts {
            set_text(&mut graph, &src, text);
            prop_assert_eq!(output(&graph, &random), before.clone());
            prop_assert_eq!(output(&graph, &concat), format!("{before}{text}"));
        }
    }
}
