//! # Textubes - Reactive Text-Transform Graph Engine
//!
//! **Textubes** keeps a directed graph of text transformations consistent. Each node is an
//! instance of a *kind* (capitalize, split, template, ...) and caches the strings it
//! produced on its output channels. Whenever the graph is edited, the engine re-evaluates
//! exactly the nodes whose inputs changed, in dependency order, until nothing changes
//! anymore.
//!
//! ## Core Workflow
//!
//! 1.  **Build a graph**: `Graph::new()` gives an empty graph over the built-in kinds, and
//!     `Graph::builder()` lets you supply an `EngineConfig` or a custom `Registry`.
//! 2.  **Edit it**: add nodes, connect them, change their params. Every mutation validates
//!     its arguments, applies the change and propagates it, returning a `PassReport`.
//! 3.  **Read results**: `output(id)` and `outputs(id)` return cached values, `ports(id)`
//!     returns the ports a node currently exposes.
//! 4.  **Persist**: `export()` returns a `GraphSnapshot`; `import_json` replaces the graph.
//!
//! ## Quick Start
//!
//! ```rust
//! use textubes::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), GraphError> {
//!     let mut graph = Graph::builder().with_seed(7).build();
//!
//!     let (source, _) = graph.add_node("source", params_from(json!({ "value": "hello" })))?;
//!     let (upper, _) = graph.add_node("capslock", Params::new())?;
//!     let (result, _) = graph.add_node("result", Params::new())?;
//!
//!     graph.add_edge(&source, None, &upper, "input")?;
//!     graph.add_edge(&upper, None, &result, "input")?;
//!     assert_eq!(graph.output(&result)?, "HELLO");
//!
//!     // Editing the source re-runs only what depends on it.
//!     let report = graph.set_node_params(&source, params_from(json!({ "value": "bye" })))?;
//!     assert_eq!(report.committed, vec![source.clone(), upper.clone(), result.clone()]);
//!     assert_eq!(graph.output(&result)?, "BYE");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Custom kinds
//!
//! Implement [`registry::Transform`] and register it through
//! [`Registry::builder`](registry::Registry::builder), or expose a built-in kind under
//! another name with `with_alias`.

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod registry;
