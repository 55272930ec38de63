use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Tunables of a [`Graph`](crate::graph::Graph).
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Re-evaluations one propagation pass may perform before it is declared
    /// non-terminating. A node's first evaluation in a pass does not count.
    pub max_iterations: usize,
    /// Reject connections that would close a cycle instead of letting them reach the
    /// iteration bound.
    pub reject_cycles: bool,
    /// Seed of the graph's random generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            reject_cycles: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::JsonParseError(e.to_string()))
    }
}
