//! # Output Formatter
//!
//! Every command result leaves through a [`Formatter`], in one of three modes:
//!
//! - **JSON**: the record or list envelope, pretty-printed with two-space indentation
//! - **Plain**: tab-separated fields, one record per line, no header and no color
//! - **Human**: tables and aligned detail blocks, colored when stdout is a terminal
//!
//! Mode precedence is JSON > plain > human (see [`Config::output_mode`]).
//!
//! Rendering and printing are split: `render_*` functions return a `String` and take
//! the color decision from the formatter, so tests can check exact output; the
//! `print_*` wrappers write it to stdout. Informational messages (`success`, `info`,
//! `warning`) only appear in human mode and are silenced by `--quiet`. Primary output
//! (records, tables, JSON, plain lines) is never silenced.
//!
//! [`Config::output_mode`]: crate::config::Config::output_mode

pub mod styles;
pub mod table;
pub mod views;

use crate::config::Config;
use crate::error::Result;
use crate::model::Page;
use console::Term;
use serde::Serialize;
use std::io::Write;
use styles::{paint, STYLES};
use table::Table;
use unicode_width::UnicodeWidthStr;

pub use views::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Info,
    Warning,
}

/// One line of a human-mode detail block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLine {
    Heading(String),
    Message(MessageLevel, String),
    Section(String),
    Field { label: String, value: String, indent: bool },
    Text(String),
    Blank,
}

/// Human rendering of a single record: a heading, optional banner, then aligned fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detail {
    lines: Vec<DetailLine>,
}

impl Detail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(mut self, text: impl Into<String>) -> Self {
        self.lines.push(DetailLine::Heading(text.into()));
        self
    }

    pub fn message(mut self, level: MessageLevel, text: impl Into<String>) -> Self {
        self.lines.push(DetailLine::Message(level, text.into()));
        self
    }

    pub fn success(self, text: impl Into<String>) -> Self {
        self.message(MessageLevel::Success, text)
    }

    pub fn section(mut self, text: impl Into<String>) -> Self {
        self.lines.push(DetailLine::Section(text.into()));
        self
    }

    pub fn field(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.lines.push(DetailLine::Field {
            label: label.into(),
            value: value.to_string(),
            indent: false,
        });
        self
    }

    /// A field nested under the preceding section.
    pub fn item(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.lines.push(DetailLine::Field {
            label: label.into(),
            value: value.to_string(),
            indent: true,
        });
        self
    }

    /// Adds the field only when `value` is non-empty.
    pub fn field_if(self, label: impl Into<String>, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.field(label, value)
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.lines.push(DetailLine::Text(text.into()));
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(DetailLine::Blank);
        self
    }

    pub fn lines(&self) -> &[DetailLine] {
        &self.lines
    }
}

/// A record prepared for every mode except JSON, which serializes the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub plain: Vec<String>,
    pub detail: Detail,
}

/// Extra human-mode lines around a list.
#[derive(Debug, Clone, Default)]
pub struct ListNotes {
    /// Replaces the default "No <noun> found" message.
    pub empty: Option<String>,
    /// Shown after the total when more pages exist.
    pub more: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    mode: OutputMode,
    color: bool,
    error_color: bool,
    quiet: bool,
}

/// Color is only ever used for human output, and never when disabled.
fn color_allowed(mode: OutputMode, no_color: bool) -> bool {
    mode == OutputMode::Human && !no_color
}

impl Formatter {
    pub fn new(config: &Config) -> Self {
        let mode = config.output_mode();
        let allow_color = color_allowed(mode, config.no_color);
        Self {
            mode,
            color: allow_color && Term::stdout().is_term(),
            error_color: allow_color && Term::stderr().is_term(),
            quiet: config.quiet,
        }
    }

    /// A formatter with an explicit color decision, for rendering in tests.
    pub fn with_color(mode: OutputMode, use_color: bool, quiet: bool) -> Self {
        let color = use_color && mode == OutputMode::Human;
        Self {
            mode,
            color,
            error_color: color,
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_human(&self) -> bool {
        self.mode == OutputMode::Human
    }

    pub fn use_color(&self) -> bool {
        self.color
    }

    pub fn render_record<T: Serialize>(&self, value: &T, view: &RecordView) -> Result<String> {
        match self.mode {
            OutputMode::Json => render_json(value),
            OutputMode::Plain => Ok(plain_line(&view.plain)),
            OutputMode::Human => Ok(self.render_detail(&view.detail)),
        }
    }

    pub fn print_record<T: Serialize>(&self, value: &T, view: &RecordView) -> Result<()> {
        write_stdout(&self.render_record(value, view)?)
    }

    pub fn render_list<T: Listing + Serialize>(&self, page: &Page<T>, notes: &ListNotes) -> Result<String> {
        match self.mode {
            OutputMode::Json => render_json(page),
            OutputMode::Plain => Ok(page
                .results
                .iter()
                .map(|item| plain_line(&item.plain_fields()))
                .collect()),
            OutputMode::Human => Ok(self.render_table(page, notes)),
        }
    }

    pub fn print_list<T: Listing + Serialize>(&self, page: &Page<T>, notes: &ListNotes) -> Result<()> {
        write_stdout(&self.render_list(page, notes)?)
    }

    fn render_table<T: Listing>(&self, page: &Page<T>, notes: &ListNotes) -> String {
        if page.is_empty() {
            let empty = notes
                .empty
                .clone()
                .unwrap_or_else(|| format!("No {} found", T::NOUN));
            return self
                .render_message(MessageLevel::Info, &empty)
                .unwrap_or_default();
        }

        let mut table = Table::new(T::HEADERS);
        for item in &page.results {
            table.push(item.row());
        }
        let mut out = table.render(self.color);

        if !self.quiet {
            out.push('\n');
            out.push_str(&format!("Total: {} {}\n", page.count, T::NOUN));
            if page.next.is_some() {
                if let Some(more) = &notes.more {
                    out.push_str(&self.render_message(MessageLevel::Info, more).unwrap_or_default());
                }
            }
        }
        out
    }

    /// Renders a detail block. Messages are dropped when quiet, along with leading blank lines.
    pub fn render_detail(&self, detail: &Detail) -> String {
        let styles = &*STYLES;
        let label_width = |indent: bool| {
            detail
                .lines()
                .iter()
                .filter_map(|line| match line {
                    DetailLine::Field { label, indent: i, .. } if *i == indent => Some(label.width() + 1),
                    _ => None,
                })
                .max()
                .unwrap_or(0)
        };
        let (top_width, nested_width) = (label_width(false), label_width(true));

        let mut lines: Vec<String> = Vec::new();
        for line in detail.lines() {
            let rendered = match line {
                DetailLine::Heading(text) => paint(&styles.heading, text, self.color),
                DetailLine::Message(level, text) => match self.message_text(*level, text) {
                    Some(text) => text,
                    None => continue,
                },
                DetailLine::Section(text) => paint(&styles.section, &format!("{}:", text), self.color),
                DetailLine::Field { label, value, indent } => {
                    let width = if *indent { nested_width } else { top_width };
                    let label = format!("{}:", label);
                    let fill = width.saturating_sub(label.width());
                    let prefix = if *indent { "  " } else { "" };
                    format!("{}{}{} {}", prefix, label, " ".repeat(fill), value)
                }
                DetailLine::Text(text) => text.clone(),
                DetailLine::Blank => {
                    if lines.is_empty() {
                        continue;
                    }
                    String::new()
                }
            };
            lines.push(rendered);
        }

        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn message_text(&self, level: MessageLevel, text: &str) -> Option<String> {
        if self.quiet || !self.is_human() {
            return None;
        }
        let styles = &*STYLES;
        let line = match (level, self.color) {
            (MessageLevel::Success, true) => format!("{} {}", paint(&styles.success, "✓", true), text),
            (MessageLevel::Info, true) => format!("{} {}", paint(&styles.info, "ℹ", true), text),
            (MessageLevel::Warning, color) => format!("{} {}", paint(&styles.warning, "Warning:", color), text),
            (_, false) => text.to_string(),
        };
        Some(line)
    }

    /// A message line including its newline, or `None` when it should not be shown.
    pub fn render_message(&self, level: MessageLevel, text: &str) -> Option<String> {
        self.message_text(level, text).map(|line| line + "\n")
    }

    fn print_message(&self, level: MessageLevel, text: &str) {
        if let Some(line) = self.render_message(level, text) {
            let _ = write_stdout(&line);
        }
    }

    pub fn success(&self, text: &str) {
        self.print_message(MessageLevel::Success, text);
    }

    pub fn info(&self, text: &str) {
        self.print_message(MessageLevel::Info, text);
    }

    pub fn warning(&self, text: &str) {
        self.print_message(MessageLevel::Warning, text);
    }

    pub fn render_error(&self, text: &str) -> String {
        format!("{} {}\n", paint(&STYLES.error, "Error:", self.error_color), text)
    }

    /// Errors always go to stderr, in every mode.
    pub fn error(&self, text: &str) {
        let _ = std::io::stderr().write_all(self.render_error(text).as_bytes());
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::with_color(OutputMode::Human, false, false)
    }
}

fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Joins fields with tabs. Tabs and newlines inside a field become spaces so each
/// record stays on one line.
fn plain_line(fields: &[String]) -> String {
    let cleaned: Vec<String> = fields
        .iter()
        .map(|f| f.replace(['\t', '\r', '\n'], " "))
        .collect();
    format!("{}\n", cleaned.join("\t"))
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
