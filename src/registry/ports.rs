//! Port shapes and the resolver helpers shared by static and dynamic kinds.
//!
//! Ports are never stored. Every query recomputes them from a node's kind, its params and
//! the values currently arriving on its inputs, so the shape can never drift from the data.

use crate::graph::model::{DEFAULT_CHANNEL, DEFAULT_INPUT};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

/// A named input or output slot on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    pub direction: Direction,
    pub is_dynamic: bool,
}

impl Port {
    pub fn input(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: Direction::Input,
            is_dynamic: false,
        }
    }

    pub fn output(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            direction: Direction::Output,
            is_dynamic: false,
        }
    }

    pub fn dynamic(mut self) -> Self {
        self.is_dynamic = true;
        self
    }
}

/// The resolved set of ports of one node at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortShape {
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
}

impl PortShape {
    /// One `input` port feeding the default `value` channel.
    pub fn single() -> Self {
        Self {
            inputs: vec![Port::input(DEFAULT_INPUT)],
            outputs: vec![Port::output(DEFAULT_CHANNEL)],
        }
    }

    /// No inputs; the node produces its value from params alone.
    pub fn source() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: vec![Port::output(DEFAULT_CHANNEL)],
        }
    }

    /// One input and no connectable outputs.
    pub fn sink() -> Self {
        Self {
            inputs: vec![Port::input(DEFAULT_INPUT)],
            outputs: Vec::new(),
        }
    }

    pub fn has_input(&self, id: &str) -> bool {
        self.inputs.iter().any(|p| p.id == id)
    }

    pub fn has_output(&self, id: &str) -> bool {
        self.outputs.iter().any(|p| p.id == id)
    }

    pub fn input_ids(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|p| p.id.as_str())
    }

    pub fn output_ids(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|p| p.id.as_str())
    }
}

/// Values currently arriving on a node's connected input ports.
///
/// Only connected ports are present; reading any other port yields `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    values: BTreeMap<String, String>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, port: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(port, value);
        self
    }

    pub fn insert(&mut self, port: impl Into<String>, value: impl Into<String>) {
        self.values.insert(port.into(), value.into());
    }

    pub fn get(&self, port: &str) -> &str {
        self.values.get(port).map(String::as_str).unwrap_or("")
    }

    /// The value on the kind's single `input` port.
    pub fn primary(&self) -> &str {
        self.get(DEFAULT_INPUT)
    }

    pub fn is_connected(&self, port: &str) -> bool {
        self.values.contains_key(port)
    }

    pub fn connected_ports(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Parses the trailing index of a positional port id such as `input-3`.
pub fn parse_port_index(port: &str, prefix: &str) -> Option<usize> {
    port.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok()
}

/// Variadic inputs `prefix-0 … prefix-k`: always one open port past the highest connected
/// index, and never fewer than `min` ports.
///
/// Counting from the highest index rather than the number of connected ports keeps every
/// connected port inside the shape. With `input-0` and `input-5` connected, a count-based
/// rule would expose three ports and strand the edge on `input-5`.
pub fn variadic_inputs(inputs: &Inputs, prefix: &str, min: usize) -> Vec<Port> {
    let count = inputs
        .connected_ports()
        .filter_map(|port| parse_port_index(port, prefix))
        .max()
        .map_or(0, |highest| highest + 2)
        .max(min);
    (0..count)
        .map(|i| Port::input(format!("{}-{}", prefix, i)).dynamic())
        .collect()
}

/// Positional output channels `prefix-0 … prefix-(count-1)`.
pub fn positional_outputs(prefix: &str, count: usize) -> Vec<Port> {
    (0..count)
        .map(|i| Port::output(format!("{}-{}", prefix, i)).dynamic())
        .collect()
}
