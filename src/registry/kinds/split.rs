use crate::graph::model::{DEFAULT_INPUT, Outputs, Params, param_str, params_from};
use crate::registry::ports::{Port, positional_outputs};
use crate::registry::{Inputs, PortShape, Transform};
use serde_json::json;

const PREFIX: &str = "output";

/// Splits `input` per the node's `mode` (`line`, `delimiter` or `character`).
///
/// Empty input yields no parts. An empty delimiter splits into characters.
pub fn split_parts(input: &str, params: &Params) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    let by_char = || -> Vec<String> { input.chars().map(String::from).collect() };
    match param_str(params, "mode", "line") {
        "character" => by_char(),
        "delimiter" => match param_str(params, "delimiter", ",") {
            "" => by_char(),
            delimiter => input.split(delimiter).map(String::from).collect(),
        },
        _ => input.split('\n').map(String::from).collect(),
    }
}

/// Fans its input out over one `output-N` channel per part.
pub struct Split;

impl Transform for Split {
    fn kind(&self) -> &str {
        "split"
    }
    fn label(&self) -> &str {
        "Split"
    }
    fn description(&self) -> &str {
        "Splits text into multiple outputs by line, delimiter, or character."
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "mode": "line", "delimiter": "," }))
    }
    fn empty(&self, _params: &Params) -> Outputs {
        Outputs::new()
    }
    fn resolve_ports(&self, params: &Params, inputs: &Inputs) -> PortShape {
        let count = split_parts(inputs.primary(), params).len();
        PortShape {
            inputs: vec![Port::input(DEFAULT_INPUT)],
            outputs: positional_outputs(PREFIX, count),
        }
    }
    fn evaluate(&self, inputs: &Inputs, params: &Params) -> Outputs {
        split_parts(inputs.primary(), params)
            .into_iter()
            .enumerate()
            .map(|(i, part)| (format!("{}-{}", PREFIX, i), part))
            .collect()
    }
}
