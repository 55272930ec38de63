use crate::graph::model::{DEFAULT_CHANNEL, Outputs, Params, param_str, params_from, single_output};
use crate::registry::ports::{Port, parse_port_index, variadic_inputs};
use crate::registry::{Inputs, PortShape, Transform};
use itertools::Itertools;
use serde_json::json;

const PREFIX: &str = "input";

/// Joins any number of inputs with a separator.
///
/// Inputs are variadic: there is always one open `input-N` port past the highest
/// connected one. Values are joined in port index order, skipping unconnected ports.
pub struct Concatenate;

impl Transform for Concatenate {
    fn kind(&self) -> &str {
        "concatenate"
    }
    fn label(&self) -> &str {
        "Concatenate"
    }
    fn description(&self) -> &str {
        "Combines multiple text inputs into one, with an optional separator between them."
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "separator": "" }))
    }
    fn resolve_ports(&self, _params: &Params, inputs: &Inputs) -> PortShape {
        PortShape {
            inputs: variadic_inputs(inputs, PREFIX, 2),
            outputs: vec![Port::output(DEFAULT_CHANNEL)],
        }
    }
    fn evaluate(&self, inputs: &Inputs, params: &Params) -> Outputs {
        let joined = inputs
            .connected_ports()
            .filter_map(|port| parse_port_index(port, PREFIX).map(|i| (i, port)))
            .sorted_by_key(|(i, _)| *i)
            .map(|(_, port)| inputs.get(port))
            .join(param_str(params, "separator", ""));
        single_output(joined)
    }
}
