use crate::graph::model::{DEFAULT_CHANNEL, Outputs, Params, single_output};
use crate::registry::ports::Port;
use crate::registry::{Inputs, PortShape, Transform};
use itertools::Itertools;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%([^%]+)%%").expect("token pattern is valid"));

const TEMPLATE_PORT: &str = "template";

/// Distinct `%%NAME%%` token names of `template`, in first-occurrence order.
pub fn scan_tokens(template: &str) -> Vec<String> {
    TOKEN_PATTERN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .unique()
        .collect()
}

/// The input port fed into `%%NAME%%`.
pub fn token_port(name: &str) -> String {
    format!("token-{}", name)
}

/// Fills `%%NAME%%` markers of the `template` input from `token-NAME` inputs.
///
/// A marker whose port is not connected is left in place.
pub struct Template;

impl Transform for Template {
    fn kind(&self) -> &str {
        "template"
    }
    fn label(&self) -> &str {
        "Template"
    }
    fn description(&self) -> &str {
        "Replaces %%TOKEN%% markers in a template with values from connected inputs."
    }
    fn resolve_ports(&self, _params: &Params, inputs: &Inputs) -> PortShape {
        let mut ports = vec![Port::input(TEMPLATE_PORT)];
        ports.extend(
            scan_tokens(inputs.get(TEMPLATE_PORT))
                .iter()
                .map(|name| Port::input(token_port(name)).dynamic()),
        );
        PortShape {
            inputs: ports,
            outputs: vec![Port::output(DEFAULT_CHANNEL)],
        }
    }
    fn evaluate(&self, inputs: &Inputs, _params: &Params) -> Outputs {
        if !inputs.is_connected(TEMPLATE_PORT) {
            return single_output("");
        }
        let filled = TOKEN_PATTERN.replace_all(inputs.get(TEMPLATE_PORT), |caps: &Captures| {
            let port = token_port(&caps[1]);
            if inputs.is_connected(&port) {
                inputs.get(&port).to_string()
            } else {
                caps[0].to_string()
            }
        });
        single_output(filled)
    }
}
