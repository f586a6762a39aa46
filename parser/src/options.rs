//! Option resolution.
//!
//! Scans tokens left to right, resolving `--long` names and `-s` aliases
//! against an [`OptionsSchema`]. Boolean options store `true`; all others
//! take the next token. Repeated options accumulate into an array in the
//! order seen. The raw object is then handed to the validator, and leftover
//! positional tokens are gated by the schema's [`VariadicPolicy`].

use command_args_core::{
    Case, OptionEntry, OptionsSchema, ValidationErrors, VariadicPolicy, convert,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::context::Context;
use crate::error::{CliError, Result, UsageError};
use crate::help::{Section, option_rows};
use crate::parsed::Parsed;
use crate::tokenize::{Token, split_non_options, usable_as_value};

impl Context {
    /// Parses the remaining arguments as options.
    ///
    /// # Errors
    ///
    /// - [`CliError::Help`](crate::CliError::Help) when the first token is
    ///   `--help`.
    /// - [`CliError::Usage`](crate::CliError::Usage) for unknown options,
    ///   missing values, validation failures and (under
    ///   [`VariadicPolicy::Deny`]) leftover positional tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args::Context;
    /// use command_args_core::{FieldSchema, OptionsSchema, Schema};
    /// use serde_json::json;
    ///
    /// let schema = OptionsSchema::new(
    ///     Schema::new()
    ///         .with_field(FieldSchema::string("username").required().with_short('u'))
    ///         .with_field(FieldSchema::boolean("verbose")),
    /// )
    /// .unwrap();
    ///
    /// let parsed = Context::new("app", ["-u", "alice", "--verbose", "--", "raw", "text"])
    ///     .options(&schema)
    ///     .unwrap();
    /// assert_eq!(parsed.get("username"), Some(&json!("alice")));
    /// assert_eq!(parsed.get("verbose"), Some(&json!(true)));
    /// assert_eq!(parsed.non_options.as_deref(), Some("raw text"));
    /// ```
    pub fn options(mut self, schema: &OptionsSchema) -> Result<Parsed> {
        let title = self.strings().options_placeholder.clone();
        self.push_placeholder(&title);
        let help = self.page(Some(Section {
            title: self.strings().options_title.clone(),
            rows: option_rows(schema, self.strings(), self.placeholder()),
        }));

        if self.wants_help() {
            return Err(CliError::Help(help));
        }

        let (tokens, trailing) = split_non_options(self.args());
        let (raw, rest) = match scan(schema, &tokens) {
            Ok(scanned) => scanned,
            Err(error) => return Err(self.usage_error(help, error)),
        };
        let keys: Vec<&String> = raw.keys().collect();
        debug!(depth = self.depth(), ?keys, leftover = rest.len(), "scanned options");

        let data = match self.validator().validate(&raw, schema.schema()) {
            Ok(data) => data,
            Err(errors) => return Err(self.usage_error(help, validation_error(&errors))),
        };

        let rest = match apply_policy(schema.variadic(), rest) {
            Ok(rest) => rest,
            Err(error) => return Err(self.usage_error(help, error)),
        };

        Ok(Parsed::new(data, rest, trailing, help, self.settings().clone()))
    }
}

/// Resolves tokens into a raw data object and leftover positionals.
fn scan(
    schema: &OptionsSchema,
    tokens: &[String],
) -> std::result::Result<(Map<String, Value>, Vec<String>), UsageError> {
    let mut raw = Map::new();
    let mut rest = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        index += 1;

        let entry = match Token::classify(token) {
            Token::Positional(value) => {
                rest.push(value.to_string());
                continue;
            }
            Token::Long(name) => schema.find_long(name),
            Token::Short(alias) => single_char(alias).and_then(|c| schema.find_short(c)),
        };
        let Some(entry) = entry else {
            return Err(UsageError::UnknownOption(token.clone()));
        };

        let value = if entry.field.kind.is_boolean() {
            Value::Bool(true)
        } else {
            match tokens.get(index) {
                Some(next) if usable_as_value(next) => {
                    index += 1;
                    Value::String(next.clone())
                }
                _ => return Err(UsageError::MissingArgument(token.clone())),
            }
        };

        debug!(option = %entry.flag, "resolved option");
        accumulate(&mut raw, entry, value);
    }

    Ok((raw, rest))
}

fn single_char(alias: &str) -> Option<char> {
    let mut chars = alias.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Stores `value` at the entry's key-path. A second occurrence promotes the
/// stored scalar to a two-element array; later ones append.
fn accumulate(raw: &mut Map<String, Value>, entry: &OptionEntry, value: Value) {
    let Some((leaf, parents)) = entry.path.segments().split_last() else {
        return;
    };

    let mut map = raw;
    for segment in parents {
        let slot = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        map = next;
    }

    match map.get_mut(leaf) {
        None => {
            map.insert(leaf.clone(), value);
        }
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Maps the first validator issue to `<kebab first segment>: <message>`.
pub(crate) fn validation_error(errors: &ValidationErrors) -> UsageError {
    match errors.first() {
        Some(issue) => UsageError::Validation {
            option: convert(issue.path.first().map_or("", String::as_str), Case::Kebab),
            message: issue.message.clone(),
        },
        None => UsageError::Custom(errors.to_string()),
    }
}

/// Applies the leftover policy; only consulted when `rest` is non-empty.
pub(crate) fn apply_policy(
    policy: VariadicPolicy,
    rest: Vec<String>,
) -> std::result::Result<Vec<String>, UsageError> {
    if rest.is_empty() {
        return Ok(rest);
    }
    match policy {
        VariadicPolicy::Allow => Ok(rest),
        VariadicPolicy::Ignore => {
            debug!(count = rest.len(), "ignoring leftover arguments");
            Ok(Vec::new())
        }
        VariadicPolicy::Deny => Err(UsageError::UnexpectedArgument(rest[0].clone())),
    }
}
