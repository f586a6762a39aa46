//! Help page composition.
//!
//! Each resolver contributes to the help of its level: the usage line
//! grows by one fragment per resolver (`<command>`, `<options>`, positional
//! names) and the resolver that runs last supplies the body section. The
//! page is plain data; [`Printer::help`](crate::Printer::help) renders it
//! with styling, [`Display`](fmt::Display) renders it as plain text.

use std::fmt;

use command_args_core::{FieldKind, FieldSchema, OptionEntry, OptionsSchema, ValuesSchema};
use serde_json::Value;

use crate::printer::pad_to;
use crate::strings::{Placeholder, Strings, render_template};

/// One line of a listing: a key and its (possibly multi-line) description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub description: Vec<String>,
}

impl Row {
    pub fn new(key: impl Into<String>, description: Vec<String>) -> Self {
        Self {
            key: key.into(),
            description,
        }
    }
}

/// Titled listing of commands, options or arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub rows: Vec<Row>,
}

/// Rendered-on-demand help for one parser level.
///
/// # Examples
///
/// ```
/// use command_args::{HelpPage, Row, Section};
///
/// let page = HelpPage::new("Usage: app <command>").with_section(Section {
///     title: "Commands:".into(),
///     rows: vec![
///         Row::new("login", vec!["Log in".into()]),
///         Row::new("message", vec!["Send a message".into(), "to a channel".into()]),
///     ],
/// });
///
/// assert_eq!(
///     page.to_string(),
///     [
///         "Usage: app <command>",
///         "",
///         "Commands:",
///         "  login    Log in",
///         "  message  Send a message",
///         "           to a channel",
///     ]
///     .join("\n")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPage {
    pub usage: String,
    pub section: Option<Section>,
    pub error: Option<String>,
}

impl HelpPage {
    /// Creates a page with only a usage line.
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            section: None,
            error: None,
        }
    }

    /// Sets the body section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    /// Sets the trailing error line.
    pub fn with_error(mut self, line: impl Into<String>) -> Self {
        self.error = Some(line.into());
        self
    }

    /// Usage and body lines, without the error line.
    ///
    /// Rows are padded to the longest key of the section; continuation lines
    /// of a description align under its first line.
    pub fn body_lines(&self) -> Vec<String> {
        let mut lines = vec![self.usage.clone()];

        let Some(section) = self.section.as_ref().filter(|s| !s.rows.is_empty()) else {
            return lines;
        };

        lines.push(String::new());
        lines.push(section.title.clone());

        let width = section
            .rows
            .iter()
            .map(|r| r.key.chars().count())
            .max()
            .unwrap_or(0);
        let indent = " ".repeat(width);

        for row in &section.rows {
            let mut description = row.description.iter();
            match description.next() {
                Some(first) => lines.push(format!("  {}  {first}", pad_to(&row.key, width))),
                None => lines.push(format!("  {}", row.key)),
            }
            for more in description {
                lines.push(format!("  {indent}  {more}"));
            }
        }

        lines
    }
}

impl fmt::Display for HelpPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body_lines().join("\n"))?;
        if let Some(error) = &self.error {
            write!(f, "\n\n{error}")?;
        }
        Ok(())
    }
}

/// Usage line from the accumulated fragments.
pub(crate) fn usage_line(strings: &Strings, invocation: &[String], fragments: &[String]) -> String {
    let usage = fragments.join(" ");
    let base = invocation.join(" ");
    render_template(&strings.usage, &[("usage", usage.as_str()), ("base", base.as_str())])
}

/// Option listing rows, in declaration order.
pub(crate) fn option_rows(
    options: &OptionsSchema,
    strings: &Strings,
    placeholder: Placeholder,
) -> Vec<Row> {
    options
        .entries()
        .iter()
        .map(|entry| Row::new(option_key(entry, placeholder), field_notes(&entry.field, strings)))
        .collect()
}

fn option_key(entry: &OptionEntry, placeholder: Placeholder) -> String {
    let mut key = format!("--{}", entry.flag);
    if let Some(alias) = entry.field.short {
        key.push_str(&format!(", -{alias}"));
    }
    if !entry.field.kind.is_boolean() {
        key.push(' ');
        key.push_str(&placeholder.wrap(entry.field.kind.type_name()));
        if entry.field.kind.is_array() {
            key.push_str("...");
        }
    }
    key
}

/// Positional argument rows, in binding order.
pub(crate) fn value_rows(
    values: &ValuesSchema,
    strings: &Strings,
    placeholder: Placeholder,
) -> Vec<Row> {
    values
        .schema()
        .iter()
        .map(|field| Row::new(placeholder.wrap(&field.name), field_notes(field, strings)))
        .collect()
}

/// Description lines: free text, enum values, default, required marker.
fn field_notes(field: &FieldSchema, strings: &Strings) -> Vec<String> {
    let mut notes: Vec<String> = field
        .description
        .as_deref()
        .map(|d| d.lines().map(str::to_string).collect())
        .unwrap_or_default();

    if let FieldKind::Enum { values } = &field.kind {
        let values = values.join(", ");
        notes.push(render_template(&strings.one_of, &[("values", values.as_str())]));
    }

    if !field.secret {
        let shown = field
            .default_description
            .clone()
            .or_else(|| field.default.as_ref().map(display_value));
        if let Some(shown) = shown {
            notes.push(render_template(&strings.default_value, &[("value", shown.as_str())]));
        }
    }

    if field.required {
        notes.push(strings.required.clone());
    }

    notes
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
