//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the textubes crate.
//!
//! # Example
//!
//! ```rust
//! use textubes::prelude::*;
//!
//! # fn run_example() -> Result<(), GraphError> {
//! let mut graph = Graph::new();
//! let (id, _) = graph.add_node("random", Params::new())?;
//! graph.regenerate(&id)?;
//! println!("{}", graph.output(&id)?);
//! # Ok(())
//! # }
//! ```

// Graph store and configuration
pub use crate::config::EngineConfig;
pub use crate::graph::model::{Edge, EdgeId, Node, NodeId, Outputs, Params, params_from};
pub use crate::graph::snapshot::GraphSnapshot;
pub use crate::graph::{Graph, GraphBuilder};

// Propagation
pub use crate::engine::PassReport;

// Kinds
pub use crate::registry::{
    Behavior, Category, Direction, Inputs, Port, PortShape, Registry, Transform,
};

// Error types
pub use crate::error::{
    ConfigError, GraphError, PropagationError, RegistryError, SnapshotError,
};
