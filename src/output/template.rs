//! Column templates such as `table {{.Driver}}\t{{.Name}}`

use super::columns::{Column, SecretRow};
use comfy_table::{Table, presets::NOTHING};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Spaces added after the widest cell of each column
const COLUMN_PADDING: u16 = 3;

static ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{-?\s*(.*?)\s*-?\}\}").expect("action pattern is valid"));

static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.([A-Za-z][A-Za-z0-9]*)$").expect("field pattern is valid"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template: can't evaluate field {0} in secret")]
    UnknownField(String),

    #[error("template: unsupported action {{{{{0}}}}}")]
    UnsupportedAction(String),

    #[error("template: unclosed action in {0:?}")]
    Unclosed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Column),
}

/// A parsed row template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    table: bool,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(format: &str) -> Result<Self, TemplateError> {
        let (table, body) = match format.strip_prefix("table") {
            Some(rest) => (true, rest.trim()),
            None => (false, format),
        };
        let body = body.strip_suffix('\n').unwrap_or(body);

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in ACTION.captures_iter(body) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(&mut segments, &body[last..whole.start()])?;

            let action = &caps[1];
            let field = FIELD
                .captures(action)
                .ok_or_else(|| TemplateError::UnsupportedAction(action.to_string()))?;
            let column = Column::from_field(&field[1])
                .ok_or_else(|| TemplateError::UnknownField(field[1].to_string()))?;
            segments.push(Segment::Field(column));

            last = whole.end();
        }
        push_text(&mut segments, &body[last..])?;

        Ok(Self { table, segments })
    }

    /// Whether a header row is printed before the rows
    pub fn is_table(&self) -> bool {
        self.table
    }

    /// The header row: every field replaced by its column header
    pub fn header(&self) -> String {
        self.expand(|column| column.header())
    }

    pub fn execute(&self, row: &SecretRow) -> String {
        self.expand(|column| row.value(column))
    }

    /// Header (for `table` templates) and one line per row, tab-aligned
    pub fn render(&self, rows: &[SecretRow]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        if self.table {
            lines.push(self.header());
        }
        lines.extend(rows.iter().map(|row| self.execute(row)));
        align_columns(&lines)
    }

    fn expand<'a>(&self, value: impl Fn(Column) -> &'a str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(column) => out.push_str(value(*column)),
            }
        }
        out
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) -> Result<(), TemplateError> {
    if text.contains("{{") {
        return Err(TemplateError::Unclosed(text.to_string()));
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
    Ok(())
}

/// Line up tab-separated cells. Each column is as wide as its widest cell
/// plus the padding, and trailing padding is trimmed. Output without any
/// tab is left as is. Every line ends with a newline.
pub fn align_columns(lines: &[String]) -> String {
    let lines: Vec<&str> = lines.iter().flat_map(|line| line.split('\n')).collect();
    if !lines.iter().any(|line| line.contains('\t')) {
        return lines.iter().map(|line| format!("{}\n", line)).collect();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    for line in &lines {
        table.add_row(line.split('\t'));
    }
    for column in table.column_iter_mut() {
        column.set_padding((0, COLUMN_PADDING));
    }

    table
        .lines()
        .map(|line| format!("{}\n", line.trim_end()))
        .collect()
}
