use crate::graph::model::{Outputs, Params, param_str, params_from, single_output};
use crate::registry::{Category, Inputs, PortShape, Transform};
use serde_json::json;

/// Free text typed by the user.
pub struct SourceText;

impl Transform for SourceText {
    fn kind(&self) -> &str {
        "source"
    }
    fn label(&self) -> &str {
        "Text"
    }
    fn description(&self) -> &str {
        "A text input node where you can manually type or paste text."
    }
    fn category(&self) -> Category {
        Category::Source
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "value": "" }))
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::source()
    }
    fn evaluate(&self, _inputs: &Inputs, params: &Params) -> Outputs {
        single_output(param_str(params, "value", ""))
    }
}

const COPYPASTAS: [(&str, &str); 4] = [
    (
        "lorem",
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.",
    ),
    (
        "bee_movie",
        "According to all known laws of aviation, there is no way a bee should be able to fly. Its wings are too small to get its fat little body off the ground. The bee, of course, flies anyway because bees don't care what humans think is impossible.",
    ),
    (
        "lorem_short",
        "The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs. How vexingly quick daft zebras jump!",
    ),
    (
        "sample",
        "This is sample text for testing your text transformation pipeline. It contains multiple sentences. Some are short. Others are a bit longer and more complex. You can use this to test various transformations and see how they work together.",
    ),
];

/// One of a few preset texts, chosen by the `selected` param.
pub struct Copypasta;

impl Copypasta {
    pub fn text(selected: &str) -> &'static str {
        COPYPASTAS
            .iter()
            .find(|(key, _)| *key == selected)
            .map(|(_, text)| *text)
            .unwrap_or("")
    }
}

impl Transform for Copypasta {
    fn kind(&self) -> &str {
        "copypasta"
    }
    fn label(&self) -> &str {
        "Copypasta"
    }
    fn description(&self) -> &str {
        "Choose from a collection of classic copypastas and sample text."
    }
    fn category(&self) -> Category {
        Category::Source
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "selected": "lorem" }))
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::source()
    }
    fn evaluate(&self, _inputs: &Inputs, params: &Params) -> Outputs {
        single_output(Copypasta::text(param_str(params, "selected", "lorem")))
    }
}

/// Displays whatever arrives on its input. It caches the text as `value` for rendering
/// but exposes no connectable output.
pub struct ResultSink;

impl Transform for ResultSink {
    fn kind(&self) -> &str {
        "result"
    }
    fn label(&self) -> &str {
        "Result"
    }
    fn description(&self) -> &str {
        "Displays the final output text. Regenerating it refreshes every random generator upstream."
    }
    fn category(&self) -> Category {
        Category::Destination
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::sink()
    }
    fn evaluate(&self, inputs: &Inputs, _params: &Params) -> Outputs {
        single_output(inputs.primary())
    }
}
