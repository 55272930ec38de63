use crate::graph::model::{Params, param_str};

pub(super) fn styled(input: &str, params: &Params) -> String {
    stylize(input, param_str(params, "style", "bold"))
}

/// Re-renders ASCII letters and digits in a Unicode style. Unknown styles return the text
/// unchanged; characters a style has no glyph for pass through.
pub fn stylize(text: &str, style: &str) -> String {
    let Some(map) = mapper(style) else {
        return text.to_string();
    };
    text.chars().map(|c| map(c).unwrap_or(c)).collect()
}

type Mapper = fn(char) -> Option<char>;

fn mapper(style: &str) -> Option<Mapper> {
    let map: Mapper = match style {
        "fullPitch" => full_pitch,
        "circled" => circled,
        "parens" => parenthesized,
        "bold" => |c| math(c, 0x1D400, Some(0x1D7CE), &[]),
        "ital" => |c| math(c, 0x1D434, None, &[('h', '\u{210E}')]),
        "boldital" => |c| math(c, 0x1D468, None, &[]),
        "boldsans" => |c| math(c, 0x1D5D4, Some(0x1D7EC), &[]),
        "italsans" => |c| math(c, 0x1D608, None, &[]),
        "bolditalsans" => |c| math(c, 0x1D63C, None, &[]),
        "script" => |c| math(c, 0x1D49C, None, SCRIPT_HOLES),
        "boldscript" => |c| math(c, 0x1D4D0, None, &[]),
        "fraktur" => |c| math(c, 0x1D504, None, FRAKTUR_HOLES),
        "doublestruck" => |c| math(c, 0x1D538, Some(0x1D7D8), DOUBLE_STRUCK_HOLES),
        "monospace" => |c| math(c, 0x1D670, Some(0x1D7F6), &[]),
        "negcircle" => negative_circled,
        "negbox" => |c| squared(c, 0x1F170),
        "box" => |c| squared(c, 0x1F130),
        _ => return None,
    };
    Some(map)
}

// Letters that predate the Mathematical Alphanumeric block live in Letterlike Symbols.
const SCRIPT_HOLES: &[(char, char)] = &[
    ('B', '\u{212C}'),
    ('E', '\u{2130}'),
    ('F', '\u{2131}'),
    ('H', '\u{210B}'),
    ('I', '\u{2110}'),
    ('L', '\u{2112}'),
    ('M', '\u{2133}'),
    ('R', '\u{211B}'),
    ('e', '\u{212F}'),
    ('g', '\u{210A}'),
    ('o', '\u{2134}'),
];

const FRAKTUR_HOLES: &[(char, char)] = &[
    ('C', '\u{212D}'),
    ('H', '\u{210C}'),
    ('I', '\u{2111}'),
    ('R', '\u{211C}'),
    ('Z', '\u{2128}'),
];

const DOUBLE_STRUCK_HOLES: &[(char, char)] = &[
    ('C', '\u{2102}'),
    ('H', '\u{210D}'),
    ('N', '\u{2115}'),
    ('P', '\u{2119}'),
    ('Q', '\u{211A}'),
    ('R', '\u{211D}'),
    ('Z', '\u{2124}'),
];

fn offset(base: u32, index: u32) -> Option<char> {
    char::from_u32(base + index)
}

/// Mathematical Alphanumeric Symbols: 26 capitals then 26 small letters from `base`.
fn math(c: char, base: u32, digits: Option<u32>, holes: &[(char, char)]) -> Option<char> {
    if let Some((_, glyph)) = holes.iter().find(|(from, _)| *from == c) {
        return Some(*glyph);
    }
    match c {
        'A'..='Z' => offset(base, c as u32 - 'A' as u32),
        'a'..='z' => offset(base, 26 + c as u32 - 'a' as u32),
        '0'..='9' => digits.and_then(|d| offset(d, c as u32 - '0' as u32)),
        _ => None,
    }
}

fn full_pitch(c: char) -> Option<char> {
    match c {
        ' ' => Some('\u{3000}'),
        '!'..='~' => offset(0xFF01, c as u32 - '!' as u32),
        _ => None,
    }
}

fn circled(c: char) -> Option<char> {
    match c {
        'A'..='Z' => offset(0x24B6, c as u32 - 'A' as u32),
        'a'..='z' => offset(0x24D0, c as u32 - 'a' as u32),
        '1'..='9' => offset(0x2460, c as u32 - '1' as u32),
        '0' => Some('\u{24EA}'),
        _ => None,
    }
}

fn parenthesized(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        l @ 'a'..='z' => offset(0x249C, l as u32 - 'a' as u32),
        '1'..='9' => offset(0x2474, c as u32 - '1' as u32),
        _ => None,
    }
}

fn negative_circled(c: char) -> Option<char> {
    match c.to_ascii_uppercase() {
        u @ 'A'..='Z' => offset(0x1F150, u as u32 - 'A' as u32),
        '1'..='9' => offset(0x2776, c as u32 - '1' as u32),
        '0' => Some('\u{24FF}'),
        _ => None,
    }
}

fn squared(c: char, base: u32) -> Option<char> {
    match c.to_ascii_uppercase() {
        u @ 'A'..='Z' => offset(base, u as u32 - 'A' as u32),
        _ => None,
    }
}
