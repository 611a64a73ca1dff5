//! Bordered table rendering for query results.
//!
//! Output follows the familiar `psql` layout: a border line, the header row,
//! a `|---+---|` rule, the data rows and a closing border. Columns whose
//! non-empty cells are all numeric are right-aligned.

use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    let aligns = (0..column_count)
        .map(|idx| column_alignment(rows, idx))
        .collect::<Vec<_>>();

    let border = rule_line('+', '+', &widths);
    let mut output = String::new();
    let _ = writeln!(output, "{border}");
    let _ = writeln!(output, "{}", format_row(headers, &widths, &aligns));
    let _ = writeln!(output, "{}", rule_line('|', '+', &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, &aligns));
    }
    let _ = writeln!(output, "{border}");
    output
}

fn column_alignment(rows: &[Vec<String>], idx: usize) -> Align {
    let mut cells = rows
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|cell| !cell.is_empty())
        .peekable();
    if cells.peek().is_none() {
        return Align::Left;
    }
    if cells.all(|cell| cell.trim().parse::<f64>().is_ok()) {
        Align::Right
    } else {
        Align::Left
    }
}

fn rule_line(edge: char, joint: char, widths: &[usize]) -> String {
    let segments = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>();
    format!("{edge}{}{edge}", segments.join(&joint.to_string()))
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut cells = Vec::with_capacity(widths.len());
    for (idx, width) in widths.iter().enumerate() {
        let value = values.get(idx).map(String::as_str).unwrap_or("");
        let sanitized = sanitize_cell(value);
        let padding = " ".repeat(width.saturating_sub(display_width(sanitized.as_ref())));
        let cell = match aligns.get(idx).copied().unwrap_or(Align::Left) {
            Align::Left => format!(" {sanitized}{padding} "),
            Align::Right => format!(" {padding}{sanitized} "),
        };
        cells.push(cell);
    }
    format!("|{}|", cells.join("|"))
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape sequence (e.g. \x1b[31m)
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
