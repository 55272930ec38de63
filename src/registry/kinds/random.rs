//! Regenerative kinds.
//!
//! Every draw comes from [`seeded_rng`], so a node re-evaluated with an unchanged seed
//! reproduces its cached output exactly. Only an explicit regenerate request changes the seed.

use super::text::whitespace_runs;
use crate::graph::model::{Outputs, Params, param_str, param_usize, params_from, single_output};
use crate::registry::{Behavior, Category, Inputs, PortShape, Transform, seeded_rng};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde_json::json;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A random alphanumeric string of `length` characters.
pub struct RandomText;

impl Transform for RandomText {
    fn kind(&self) -> &str {
        "random"
    }
    fn label(&self) -> &str {
        "Random"
    }
    fn description(&self) -> &str {
        "Generates random alphanumeric text of a specified length."
    }
    fn category(&self) -> Category {
        Category::Source
    }
    fn behavior(&self) -> Behavior {
        Behavior::Regenerative
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "length": 10 }))
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::source()
    }
    fn evaluate(&self, _inputs: &Inputs, params: &Params) -> Outputs {
        let mut rng = seeded_rng(params);
        let text: String = (0..param_usize(params, "length", 10))
            .map(|_| ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())] as char)
            .collect();
        single_output(text)
    }
}

const NOUNS: &[&str] = &[
    "apple", "anchor", "badger", "balloon", "banjo", "beacon", "bicycle", "biscuit", "blanket",
    "bottle", "bucket", "cabbage", "cactus", "camera", "candle", "canyon", "carpet", "castle",
    "cathedral", "cello", "chimney", "cloud", "comet", "compass", "cookie", "crayon", "crystal",
    "dolphin", "dragon", "drum", "eagle", "engine", "envelope", "falcon", "feather", "fiddle",
    "forest", "fountain", "galaxy", "garden", "giraffe", "glacier", "goblin", "guitar", "hammer",
    "harbor", "helmet", "island", "jacket", "jellyfish", "kettle", "kitten", "ladder", "lantern",
    "lemon", "library", "lighthouse", "lizard", "magnet", "marble", "meadow", "mirror", "mountain",
    "mushroom", "needle", "noodle", "ocean", "octopus", "orchard", "otter", "paddle", "pancake",
    "parrot", "pebble", "pencil", "penguin", "piano", "pillow", "planet", "pocket", "potato",
    "pumpkin", "puzzle", "quill", "rabbit", "raccoon", "rainbow", "river", "rocket", "saddle",
    "sandwich", "satellite", "scarecrow", "squirrel", "suitcase", "teapot", "telescope",
    "thunder", "tiger", "tornado", "trumpet", "tulip", "umbrella", "valley", "violin", "volcano",
    "wagon", "walrus", "waterfall", "whistle", "window", "wizard", "yacht", "zebra",
];

/// A random noun from an embedded word list.
pub struct RandomNoun;

impl Transform for RandomNoun {
    fn kind(&self) -> &str {
        "randomnoun"
    }
    fn label(&self) -> &str {
        "Random Noun"
    }
    fn description(&self) -> &str {
        "Outputs a random English noun."
    }
    fn category(&self) -> Category {
        Category::Source
    }
    fn behavior(&self) -> Behavior {
        Behavior::Regenerative
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::source()
    }
    fn evaluate(&self, _inputs: &Inputs, params: &Params) -> Outputs {
        let mut rng = seeded_rng(params);
        single_output(NOUNS.choose(&mut rng).copied().unwrap_or_default())
    }
}

/// Reorders characters, words or lines of its input.
pub struct Shuffle;

impl Shuffle {
    fn shuffle(text: &str, mode: &str, rng: &mut StdRng) -> String {
        match mode {
            "word" => {
                // Whitespace runs are tokens too.
                let mut runs = whitespace_runs(text);
                runs.shuffle(rng);
                runs.concat()
            }
            "line" => {
                let mut lines: Vec<&str> = text.split('\n').collect();
                lines.shuffle(rng);
                lines.join("\n")
            }
            "character" => {
                let mut chars: Vec<char> = text.chars().collect();
                chars.shuffle(rng);
                chars.into_iter().collect()
            }
            _ => text.to_string(),
        }
    }
}

impl Transform for Shuffle {
    fn kind(&self) -> &str {
        "shuffle"
    }
    fn label(&self) -> &str {
        "Shuffle"
    }
    fn description(&self) -> &str {
        "Randomly shuffles characters, words, or lines of the input text."
    }
    fn behavior(&self) -> Behavior {
        Behavior::Regenerative
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "mode": "character" }))
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::single()
    }
    fn evaluate(&self, inputs: &Inputs, params: &Params) -> Outputs {
        let mut rng = seeded_rng(params);
        let mode = param_str(params, "mode", "character");
        single_output(Shuffle::shuffle(inputs.primary(), mode, &mut rng))
    }
}

const ZALGO_UP: &[char] = &[
    '\u{030d}', '\u{030e}', '\u{0304}', '\u{0305}', '\u{033f}', '\u{0311}', '\u{0306}', '\u{0310}',
    '\u{0352}', '\u{0357}', '\u{0351}', '\u{0307}', '\u{0308}', '\u{030a}', '\u{0342}', '\u{0343}',
    '\u{0344}', '\u{034a}', '\u{034b}', '\u{034c}', '\u{0303}', '\u{0302}', '\u{030c}', '\u{0350}',
    '\u{0300}', '\u{0301}', '\u{030b}', '\u{030f}', '\u{0312}', '\u{0313}', '\u{0314}', '\u{033d}',
    '\u{0309}', '\u{0363}', '\u{0364}', '\u{0365}', '\u{0366}', '\u{0367}', '\u{0368}', '\u{0369}',
    '\u{036a}', '\u{036b}', '\u{036c}', '\u{036d}', '\u{036e}', '\u{036f}', '\u{033e}', '\u{035b}',
    '\u{0346}', '\u{031a}',
];

const ZALGO_DOWN: &[char] = &[
    '\u{0316}', '\u{0317}', '\u{0318}', '\u{0319}', '\u{031c}', '\u{031d}', '\u{031e}', '\u{031f}',
    '\u{0320}', '\u{0324}', '\u{0325}', '\u{0326}', '\u{0329}', '\u{032a}', '\u{032b}', '\u{032c}',
    '\u{032d}', '\u{032e}', '\u{032f}', '\u{0330}', '\u{0331}', '\u{0332}', '\u{0333}', '\u{0339}',
    '\u{033a}', '\u{033b}', '\u{033c}', '\u{0345}', '\u{0347}', '\u{0348}', '\u{0349}', '\u{034d}',
    '\u{034e}', '\u{0353}', '\u{0354}', '\u{0355}', '\u{0356}', '\u{0359}', '\u{035a}', '\u{0323}',
];

const ZALGO_MID: &[char] = &[
    '\u{0315}', '\u{031b}', '\u{0340}', '\u{0341}', '\u{0358}', '\u{0321}', '\u{0322}', '\u{0327}',
    '\u{0328}', '\u{0334}', '\u{0335}', '\u{0336}', '\u{034f}', '\u{035c}', '\u{035d}', '\u{035e}',
    '\u{035f}', '\u{0360}', '\u{0362}', '\u{0338}', '\u{0337}', '\u{0361}', '\u{0489}',
];

const MAX_ZALGO_INTENSITY: usize = 10;

/// Piles 1..=`intensity` random combining marks onto every character. Intensity is kept
/// within 1..=10.
pub struct Zalgo;

impl Zalgo {
    pub fn is_mark(c: char) -> bool {
        ZALGO_UP.contains(&c) || ZALGO_DOWN.contains(&c) || ZALGO_MID.contains(&c)
    }
}

impl Transform for Zalgo {
    fn kind(&self) -> &str {
        "zalgo"
    }
    fn label(&self) -> &str {
        "Zalgo"
    }
    fn description(&self) -> &str {
        "Adds chaotic combining diacritical marks to create glitchy text."
    }
    fn behavior(&self) -> Behavior {
        Behavior::Regenerative
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "intensity": 3 }))
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::single()
    }
    fn evaluate(&self, inputs: &Inputs, params: &Params) -> Outputs {
        let mut rng = seeded_rng(params);
        let intensity = param_usize(params, "intensity", 3).clamp(1, MAX_ZALGO_INTENSITY);
        let mut out = String::new();
        for c in inputs.primary().chars() {
            out.push(c);
            for _ in 0..rng.random_range(1..=intensity) {
                let roll: f64 = rng.random();
                let marks = if roll < 0.4 {
                    ZALGO_UP
                } else if roll < 0.8 {
                    ZALGO_DOWN
                } else {
                    ZALGO_MID
                };
                if let Some(mark) = marks.choose(&mut rng) {
                    out.push(*mark);
                }
            }
        }
        single_output(out)
    }
}

/// Picks one character, word or line of its input at random.
pub struct RandomSelection;

impl Transform for RandomSelection {
    fn kind(&self) -> &str {
        "randomselection"
    }
    fn label(&self) -> &str {
        "Random Selection"
    }
    fn description(&self) -> &str {
        "Randomly selects a single character, word, or line from the input."
    }
    fn behavior(&self) -> Behavior {
        Behavior::Regenerative
    }
    fn default_params(&self) -> Params {
        params_from(json!({ "mode": "word" }))
    }
    fn resolve_ports(&self, _params: &Params, _inputs: &Inputs) -> PortShape {
        PortShape::single()
    }
    fn evaluate(&self, inputs: &Inputs, params: &Params) -> Outputs {
        let mut rng = seeded_rng(params);
        let input = inputs.primary();
        let picked = match param_str(params, "mode", "word") {
            "character" => {
                let chars: Vec<char> = input.chars().collect();
                chars.choose(&mut rng).map(char::to_string)
            }
            "line" => {
                let lines: Vec<&str> = input.split('\n').filter(|l| !l.is_empty()).collect();
                lines.choose(&mut rng).map(|l| l.to_string())
            }
            _ => {
                let words: Vec<&str> = input.split_whitespace().collect();
                words.choose(&mut rng).map(|w| w.to_string())
            }
        };
        single_output(picked.unwrap_or_default())
    }
}
