//! Column layout for human-mode tables.
//!
//! Widths are measured in terminal display columns, so wide (CJK, emoji) text lines up.
//! Styling is applied after padding so escape codes never count toward a width.

use super::styles::{paint, STYLES};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const GAP: &str = "  ";
const ELLIPSIS: &str = "...";

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.width());
            }
        }
        widths
    }

    /// Header row, separator row, then one line per row. Every line ends in `\n`.
    pub fn render(&self, use_color: bool) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let widths = self.widths();
        let styles = &*STYLES;
        let mut out = String::new();

        let header: Vec<String> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| paint(&styles.header, &pad(h, widths[i], i + 1 == widths.len()), use_color))
            .collect();
        push_line(&mut out, &header);

        let rule = if use_color { "─" } else { "-" };
        let separator: Vec<String> = widths
            .iter()
            .map(|w| paint(&styles.separator, &rule.repeat(*w), use_color))
            .collect();
        push_line(&mut out, &separator);

        for row in &self.rows {
            let cells: Vec<String> = (0..widths.len())
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let padded = pad(cell, widths[i], i + 1 == widths.len());
                    if i == 0 {
                        paint(&styles.key_column, &padded, use_color)
                    } else {
                        padded
                    }
                })
                .collect();
            push_line(&mut out, &cells);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push_str(cells.join(GAP).trim_end());
    out.push('\n');
}

fn pad(text: &str, width: usize, last: bool) -> String {
    if last {
        return text.to_string();
    }
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Longest prefix of `text` that fits in `width` display columns.
fn take_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[..idx];
        }
    }
    text
}

/// Shortens `text` to at most `max` display columns, marking the cut with `...`.
///
/// Widths below 3 are treated as 3; at exactly 3 the text is cut without an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    let max = max.max(ELLIPSIS.len());
    if text.width() <= max {
        return text.to_string();
    }
    if max == ELLIPSIS.len() {
        return take_width(text, max).to_string();
    }
    let kept = take_width(text, max - ELLIPSIS.len()).trim_end();
    format!("{}{}", kept, ELLIPSIS)
}

/// Comma-joined tags truncated to `max`, or `-` when there are none.
pub fn format_tags(tags: &[String], max: usize) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    truncate(&tags.join(", "), max)
}
