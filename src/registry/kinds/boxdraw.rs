use crate::graph::model::{Params, param_str};

struct BoxStyle {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

const SIMPLE: BoxStyle = BoxStyle {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
};

const DOUBLE: BoxStyle = BoxStyle {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    horizontal: '═',
    vertical: '║',
};

const ROUNDED: BoxStyle = BoxStyle {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    horizontal: '─',
    vertical: '│',
};

const BOLD: BoxStyle = BoxStyle {
    top_left: '┏',
    top_right: '┓',
    bottom_left: '┗',
    bottom_right: '┛',
    horizontal: '━',
    vertical: '┃',
};

fn style_by_name(name: &str) -> &'static BoxStyle {
    match name {
        "double" => &DOUBLE,
        "rounded" => &ROUNDED,
        "bold" => &BOLD,
        _ => &SIMPLE,
    }
}

pub(super) fn boxed(input: &str, params: &Params) -> String {
    create_box(input, param_str(params, "style", "simple"))
}

/// Draws a box around every line of `text`, padding lines to the widest one.
pub fn create_box(text: &str, style: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let style = style_by_name(style);
    let lines: Vec<&str> = text.split('\n').collect();
    let max = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = |left: char, right: char| {
        let mut row = String::new();
        row.push(left);
        row.extend(std::iter::repeat_n(style.horizontal, max));
        row.push(right);
        row
    };

    let mut rows = Vec::with_capacity(lines.len() + 2);
    rows.push(border(style.top_left, style.top_right));
    for line in lines {
        let padding = " ".repeat(max - line.chars().count());
        rows.push(format!("{v}{line}{padding}{v}", v = style.vertical));
    }
    rows.push(border(style.bottom_left, style.bottom_right));
    rows.join("\n")
}
