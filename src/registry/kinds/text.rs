use crate::graph::model::{MAX_REPEAT_BYTES, Params, param_i64, param_str, param_usize};

pub(super) fn capslock(input: &str, _params: &Params) -> String {
    input.to_uppercase()
}

pub(super) fn reverse(input: &str, _params: &Params) -> String {
    input.chars().rev().collect()
}

pub(super) fn replace(input: &str, params: &Params) -> String {
    let search = param_str(params, "searchText", "");
    if search.is_empty() {
        return input.to_string();
    }
    input.replace(search, param_str(params, "replaceText", ""))
}

pub(super) fn trim_pad(input: &str, params: &Params) -> String {
    let pad_length = param_usize(params, "padLength", 10);
    let pad_char = param_str(params, "padChar", " ").chars().next().unwrap_or(' ');
    let missing = pad_length.saturating_sub(input.chars().count());
    match param_str(params, "mode", "trim") {
        "padStart" => std::iter::repeat_n(pad_char, missing).chain(input.chars()).collect(),
        "padEnd" => input.chars().chain(std::iter::repeat_n(pad_char, missing)).collect(),
        _ => input.trim().to_string(),
    }
}

pub(super) fn repeat(input: &str, params: &Params) -> String {
    let fits = MAX_REPEAT_BYTES / input.len().max(1);
    input.repeat(param_usize(params, "count", 3).min(fits))
}

/// Caesar shift over ASCII letters; everything else passes through.
pub(super) fn rotate(input: &str, params: &Params) -> String {
    let shift = param_i64(params, "shift", 13).rem_euclid(26) as u8;
    input
        .chars()
        .map(|c| match c {
            'A'..='Z' => ((c as u8 - b'A' + shift) % 26 + b'A') as char,
            'a'..='z' => ((c as u8 - b'a' + shift) % 26 + b'a') as char,
            _ => c,
        })
        .collect()
}

pub(super) fn wrap(input: &str, params: &Params) -> String {
    let max = param_usize(params, "length", 80);
    let alignment = Alignment::parse(param_str(params, "alignment", "left"));
    wrap_text(input, max, alignment)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Left,
    Full,
    Right,
    Center,
}

impl Alignment {
    fn parse(s: &str) -> Self {
        match s {
            "full" => Alignment::Full,
            "right" => Alignment::Right,
            "center" => Alignment::Center,
            _ => Alignment::Left,
        }
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Greedy word wrap that keeps existing line breaks as paragraph boundaries.
fn wrap_text(text: &str, max: usize, alignment: Alignment) -> String {
    if max == 0 {
        return text.to_string();
    }

    text.split('\n')
        .map(|paragraph| {
            if width(paragraph) <= max {
                return align(paragraph, max, alignment, true);
            }

            let mut lines: Vec<String> = Vec::new();
            let mut current = String::new();
            for word in whitespace_runs(paragraph) {
                if width(&current) + width(word) <= max {
                    current.push_str(word);
                } else if !current.is_empty() {
                    lines.push(current.trim_end().to_string());
                    current = word.trim_start().to_string();
                } else {
                    // A single word longer than the line.
                    lines.push(word.to_string());
                }
            }
            if !current.is_empty() {
                lines.push(current.trim_end().to_string());
            }

            let last = lines.len().saturating_sub(1);
            lines
                .iter()
                .enumerate()
                .map(|(i, line)| align(line, max, alignment, i == last))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn align(line: &str, max: usize, alignment: Alignment, is_last_line: bool) -> String {
    let trimmed = line.trim_end();
    let len = width(trimmed);
    if alignment == Alignment::Left || len >= max {
        return trimmed.to_string();
    }

    match alignment {
        Alignment::Full if !is_last_line => {
            let words: Vec<&str> = trimmed.split_whitespace().collect();
            if words.len() <= 1 {
                return trimmed.to_string();
            }
            let total_spaces = max - words.iter().map(|w| width(w)).sum::<usize>();
            let gaps = words.len() - 1;
            let mut out = String::new();
            for (i, word) in words.iter().enumerate() {
                out.push_str(word);
                if i < gaps {
                    let spaces = total_spaces / gaps + usize::from(i < total_spaces % gaps);
                    out.push_str(&" ".repeat(spaces));
                }
            }
            out
        }
        Alignment::Right => format!("{}{}", " ".repeat(max - len), trimmed),
        Alignment::Center => format!("{}{}", " ".repeat((max - len) / 2), trimmed),
        _ => trimmed.to_string(),
    }
}

/// Splits text into alternating runs of whitespace and non-whitespace, keeping both.
pub(super) fn whitespace_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let is_space = c.is_whitespace();
        if in_space.is_some_and(|prev| prev != is_space) {
            runs.push(&text[start..i]);
            start = i;
        }
        in_space = Some(is_space);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}
