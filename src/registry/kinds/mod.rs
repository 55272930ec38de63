//! Built-in node kinds.
//!
//! Single-input, single-output deterministic kinds are declared through
//! [`define_simple_transforms!`]; kinds with dynamic ports, randomness, or no inputs
//! implement [`Transform`] by hand in their own modules.

use super::{Inputs, PortShape, Transform};
use crate::graph::model::{Outputs, Params, params_from, single_output};
use ahash::AHashMap;
use serde_json::json;

mod boxdraw;
mod endpoints;
mod join;
mod random;
mod split;
mod template;
mod text;
mod unicode;

pub use boxdraw::create_box;
pub use endpoints::{Copypasta, ResultSink, SourceText};
pub use join::Concatenate;
pub use random::{RandomNoun, RandomSelection, RandomText, Shuffle, Zalgo};
pub use split::{Split, split_parts};
pub use template::{Template, scan_tokens, token_port};
pub use unicode::stylize;

/// Declares the simple kinds, their registration, and their creation by name.
macro_rules! define_simple_transforms {
    ( $( ($struct_name:ident, $kind:literal, $label:literal, $description:literal, $defaults:expr, $body:path) ),* $(,)? ) => {
        $(
            pub struct $struct_name;
            impl Transform for $struct_name {
                fn kind(&self) -> &str { $kind }
                fn label(&self) -> &str { $label }
                fn description(&self) -> &str { $description }
                fn default_params(&self) -> Params { params_from($defaults) }
                fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
                    PortShape::single()
                }
                fn evaluate(&self, inputs: &Inputs, params: &Params) -> Outputs {
                    single_output($body(inputs.primary(), params))
                }
            }
        )*

        fn register_simple_transforms(registry: &mut AHashMap<String, Box<dyn Transform>>) {
            $( registry.insert($kind.to_string(), Box::new($struct_name)); )*
        }

        fn create_simple_by_kind(kind: &str) -> Option<Box<dyn Transform>> {
            match kind {
                $( $kind => Some(Box::new($struct_name)), )*
                _ => None,
            }
        }
    };
}

define_simple_transforms! {
    (Capslock, "capslock", "Capslock", "Converts all input text to uppercase letters.",
        json!({}), text::capslock),
    (Reverse, "reverse", "Reverse", "Reverses the order of characters in the input text.",
        json!({}), text::reverse),
    (Replace, "replace", "Replace", "Finds all occurrences of a search pattern and replaces them with new text.",
        json!({ "searchText": "", "replaceText": "" }), text::replace),
    (TrimPad, "trimpad", "Trim/Pad", "Trims whitespace from text or pads it to a specified length.",
        json!({ "mode": "trim", "padLength": 10, "padChar": " " }), text::trim_pad),
    (Repeat, "repeat", "Repeat", "Repeats the input text a specified number of times.",
        json!({ "count": 3 }), text::repeat),
    (Rot13, "rot13", "ROT13", "Shifts every latin letter by a fixed amount (13 by default).",
        json!({ "shift": 13 }), text::rotate),
    (BoxDraw, "box", "Box", "Surrounds text with box-drawing characters in various styles.",
        json!({ "style": "simple" }), boxdraw::boxed),
    (UnicodeStyle, "unicode", "Unicode Abuse", "Applies Unicode text styles like bold, italic, circled, and more.",
        json!({ "style": "bold" }), unicode::styled),
    (WrapText, "wrap", "Wrap Text", "Wraps text to a maximum line length with optional alignment.",
        json!({ "length": 80, "alignment": "left" }), text::wrap),
}

/// Registers every built-in kind under its own name.
pub(super) fn register_builtin_transforms(registry: &mut AHashMap<String, Box<dyn Transform>>) {
    register_simple_transforms(registry);
    for kind in COMPOSITE_KINDS {
        if let Some(transform) = create_composite_by_kind(kind) {
            registry.insert(kind.to_string(), transform);
        }
    }
}

/// Creates a fresh instance of a built-in kind, used for aliases.
pub(super) fn create_builtin_by_kind(kind: &str) -> Option<Box<dyn Transform>> {
    create_simple_by_kind(kind).or_else(|| create_composite_by_kind(kind))
}

const COMPOSITE_KINDS: [&str; 11] = [
    "source",
    "copypasta",
    "random",
    "randomnoun",
    "shuffle",
    "zalgo",
    "randomselection",
    "concatenate",
    "split",
    "template",
    "result",
];

fn create_composite_by_kind(kind: &str) -> Option<Box<dyn Transform>> {
    match kind {
        "source" => Some(Box::new(SourceText)),
        "copypasta" => Some(Box::new(Copypasta)),
        "random" => Some(Box::new(RandomText)),
        "randomnoun" => Some(Box::new(RandomNoun)),
        "shuffle" => Some(Box::new(Shuffle)),
        "zalgo" => Some(Box::new(Zalgo)),
        "randomselection" => Some(Box::new(RandomSelection)),
        "concatenate" => Some(Box::new(Concatenate)),
        "split" => Some(Box::new(Split)),
        "template" => Some(Box::new(Template)),
        "result" => Some(Box::new(ResultSink)),
        _ => None,
    }
}
