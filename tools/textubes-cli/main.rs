use clap::Parser;
use serde_json::Value;
use std::fs;
use std::time::Instant;
use textubes::prelude::*;
use tracing_subscriber::EnvFilter;

/// Loads a text-transform graph, applies edits, and prints what every node produces
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph snapshot JSON file
    graph_path: Option<String>,

    /// Set a node parameter, as NODE.KEY=VALUE (repeatable)
    #[arg(short, long = "set", value_name = "NODE.KEY=VALUE")]
    sets: Vec<String>,

    /// Regenerate a node, or everything upstream of a result node (repeatable)
    #[arg(short, long = "regenerate", value_name = "NODE")]
    regenerates: Vec<String>,

    /// Also print the ports every node currently exposes
    #[arg(short, long)]
    ports: bool,

    /// Write the resulting graph snapshot to this path
    #[arg(short, long, value_name = "PATH")]
    export: Option<String>,

    /// Path to an engine configuration JSON file
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Seed for regenerate requests, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// List the available node kinds and exit
    #[arg(long)]
    catalog: bool,
}

fn main() {
    let filter = EnvFilter::try_from_env("TEXTUBES_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("textubes=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut graph = build_graph(&cli);

    if cli.catalog {
        print_catalog(&graph);
        return;
    }

    let graph_path = cli
        .graph_path
        .as_deref()
        .unwrap_or_else(|| exit_with_error("A graph snapshot path is required."));
    let graph_json = fs::read_to_string(graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read graph file '{}': {}", graph_path, e))
    });

    let start = Instant::now();
    let report = graph
        .import_json(&graph_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import graph: {}", e)));
    println!(
        "Imported {} nodes and {} edges ({} evaluations) in {:?}",
        graph.nodes().len(),
        graph.edges().len(),
        report.evaluations(),
        start.elapsed()
    );

    for assignment in &cli.sets {
        let (node_id, key, value) = parse_assignment(assignment);
        let mut partial = Params::new();
        partial.insert(key.to_string(), Value::String(value.to_string()));
        let report = graph.set_node_params(node_id, partial).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to apply '{}': {}", assignment, e))
        });
        println!("set {}: {} nodes changed", assignment, report.committed.len());
    }

    for node_id in &cli.regenerates {
        let regenerative = graph
            .node(node_id)
            .and_then(|n| graph.registry().get(&n.kind).ok())
            .is_some_and(|t| t.behavior() == Behavior::Regenerative);
        let result = if regenerative {
            graph.regenerate(node_id)
        } else {
            graph.regenerate_upstream(node_id)
        };
        let report = result.unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to regenerate '{}': {}", node_id, e))
        });
        println!("regenerate {}: {} nodes changed", node_id, report.committed.len());
    }

    print_outputs(&graph, cli.ports);

    if let Some(path) = &cli.export {
        let json = graph
            .export()
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
        fs::write(path, json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
        println!("\nExported graph to {}", path);
    }
}

fn build_graph(cli: &Cli) -> Graph {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read config file '{}': {}", path, e))
            });
            EngineConfig::from_json(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()))
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Graph::builder().with_config(config).build()
}

/// Splits `NODE.KEY=VALUE`. Node ids may contain dots, so the last dot before `=` wins.
fn parse_assignment(assignment: &str) -> (&str, &str, &str) {
    let (target, value) = assignment
        .split_once('=')
        .unwrap_or_else(|| exit_with_error(&format!("Expected NODE.KEY=VALUE, got '{}'", assignment)));
    let (node_id, key) = target
        .rsplit_once('.')
        .unwrap_or_else(|| exit_with_error(&format!("Expected NODE.KEY=VALUE, got '{}'", assignment)));
    (node_id, key, value)
}

fn print_outputs(graph: &Graph, with_ports: bool) {
    println!("\n--- Node Outputs ---");
    for node in graph.nodes() {
        println!("[{}] ({})", node.id, node.kind);
        if node.outputs.is_empty() {
            println!("    (no output)");
        }
        for (channel, value) in &node.outputs {
            println!("    {}: {:?}", channel, value);
        }
        if with_ports {
            if let Ok(shape) = graph.ports(&node.id) {
                let inputs: Vec<&str> = shape.input_ids().collect();
                let outputs: Vec<&str> = shape.output_ids().collect();
                println!("    ports: in {:?} / out {:?}", inputs, outputs);
            }
        }
    }
}

fn print_catalog(graph: &Graph) {
    println!("--- Node Kinds ---");
    for entry in graph.catalog() {
        println!(
            "{:<16} {:<12} {:<14} {}",
            entry.kind,
            format!("{:?}", entry.category),
            format!("{:?}", entry.behavior),
            entry.description
        );
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
