use thiserror::Error;

/// Errors raised when looking up a node kind in the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Node kind '{0}' is not registered")]
    UnknownKind(String),

    #[error("Cannot alias '{alias}' to '{target}': no built-in kind with that name")]
    InvalidAlias { alias: String, target: String },
}

/// Errors that abort a propagation pass.
///
/// A pass that fails leaves the graph exactly as it was before the triggering mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropagationError {
    #[error(
        "Propagation did not reach a fixpoint within {bound} evaluations (last evaluated node: '{last_node_id}'); the graph likely contains a cycle"
    )]
    IterationBoundExceeded { bound: usize, last_node_id: String },
}

/// Errors that can occur while importing a graph document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Failed to parse graph document JSON: {0}")]
    JsonParseError(String),

    #[error("Graph document must be a JSON object")]
    NotAnObject,

    #[error("Graph document is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("Graph document field '{0}' must be an array")]
    NotAnArray(&'static str),

    #[error("Graph document is malformed: {0}")]
    Malformed(String),

    #[error("Graph document declares node '{0}' more than once")]
    DuplicateNode(String),
}

/// Errors returned by graph store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("A connection to node '{target_node_id}' on port '{target_port}' is invalid: {message}")]
    InvalidConnection {
        target_node_id: String,
        target_port: String,
        message: String,
    },

    #[error("Node '{0}' cannot be connected to itself")]
    SelfLoop(String),

    #[error("Connecting '{source_node_id}' to '{target_node_id}' would create a cycle")]
    CycleDetected {
        source_node_id: String,
        target_node_id: String,
    },

    #[error("Node '{node_id}' of kind '{kind}' has no random state to regenerate")]
    NotRegenerative { node_id: String, kind: String },

    #[error(transparent)]
    Propagation(#[from] PropagationError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Errors raised while reading an engine configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse engine configuration: {0}")]
    JsonParseError(String),
}
