//! Flattened option tables.
//!
//! [`OptionsSchema`] turns a (possibly nested) [`Schema`] into one
//! [`OptionEntry`] per leaf key-path, indexed by long flag and short alias.
//! Construction runs [`validate_options`](crate::validate_options), so a
//! built table always satisfies the short alias invariant.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::case::{Case, convert};
use crate::{FieldKind, FieldSchema, Schema, SchemaError, validate_options};

/// Handling of leftover positional tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum VariadicPolicy {
    /// Keep leftovers in `rest`.
    Allow,
    /// Drop leftovers silently.
    Ignore,
    /// Report the first leftover as an unexpected argument (the default).
    #[default]
    Deny,
}

/// Path of a field inside a nested schema.
///
/// # Examples
///
/// ```
/// use command_args_core::KeyPath;
///
/// let path = KeyPath::new(vec!["database".into(), "maxRetries".into()]);
/// assert_eq!(path.flag(), "database.max-retries");
/// assert_eq!(path.to_string(), "database.maxRetries");
/// assert_eq!(path.first(), "database");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Creates a path from its segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Outermost segment.
    pub fn first(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Long flag name without the leading dashes.
    pub fn flag(&self) -> String {
        self.0
            .iter()
            .map(|s| convert(s, Case::Kebab))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// One leaf of a flattened schema.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    /// Location of the field in the raw data object.
    pub path: KeyPath,
    /// Long flag name (`max-retries`, `database.host`).
    pub flag: String,
    /// Leaf field schema.
    pub field: FieldSchema,
}

/// Flattens nested objects into leaf entries in declaration order.
pub(crate) fn flatten(schema: &Schema) -> Vec<OptionEntry> {
    let mut entries = Vec::new();
    flatten_into(&schema.fields, &KeyPath::new(Vec::new()), &mut entries);
    entries
}

fn flatten_into(fields: &[FieldSchema], prefix: &KeyPath, out: &mut Vec<OptionEntry>) {
    for field in fields {
        let path = prefix.child(&field.name);
        match &field.kind {
            FieldKind::Object { fields } => flatten_into(fields, &path, out),
            _ => out.push(OptionEntry {
                flag: path.flag(),
                path,
                field: field.clone(),
            }),
        }
    }
}

/// Construction-checked option table for the option resolver.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let options = OptionsSchema::new(
///     Schema::new()
///         .with_field(FieldSchema::string("userName").with_short('u'))
///         .with_field(FieldSchema::boolean("verbose")),
/// )
/// .unwrap();
///
/// assert_eq!(options.find_long("user-name").unwrap().path.to_string(), "userName");
/// assert_eq!(options.find_short('u').unwrap().flag, "user-name");
/// assert!(options.find_long("missing").is_none());
/// assert_eq!(options.variadic(), VariadicPolicy::Deny);
/// ```
#[derive(Debug, Clone)]
pub struct OptionsSchema {
    schema: Schema,
    entries: Vec<OptionEntry>,
    longs: HashMap<String, usize>,
    shorts: HashMap<char, usize>,
    variadic: VariadicPolicy,
}

impl OptionsSchema {
    /// Builds the table.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] reported by
    /// [`validate_options`](crate::validate_options), e.g.
    /// [`DuplicateShortAlias`](SchemaError::DuplicateShortAlias).
    pub fn new(schema: impl Into<Schema>) -> Result<Self, SchemaError> {
        let schema = schema.into();
        if let Some(error) = validate_options(&schema).into_iter().next() {
            return Err(error);
        }

        let entries = flatten(&schema);
        let longs = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.flag.clone(), i))
            .collect();
        let shorts = entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.field.short.map(|c| (c, i)))
            .collect();

        Ok(Self {
            schema,
            entries,
            longs,
            shorts,
            variadic: VariadicPolicy::default(),
        })
    }

    /// Sets the policy for leftover positional tokens.
    pub fn with_variadic(mut self, policy: VariadicPolicy) -> Self {
        self.variadic = policy;
        self
    }

    /// Policy for leftover positional tokens.
    pub fn variadic(&self) -> VariadicPolicy {
        self.variadic
    }

    /// Source schema, as handed to the validator.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Leaf entries in declaration order.
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Resolves a long flag written without dashes.
    ///
    /// Each dotted segment is case-converted before lookup, so `userName`
    /// and `user-name` resolve to the same entry.
    pub fn find_long(&self, name: &str) -> Option<&OptionEntry> {
        let flag = name
            .split('.')
            .map(|s| convert(s, Case::Kebab))
            .collect::<Vec<_>>()
            .join(".");
        self.longs.get(&flag).map(|&i| &self.entries[i])
    }

    /// Resolves a short alias.
    pub fn find_short(&self, alias: char) -> Option<&OptionEntry> {
        self.shorts.get(&alias).map(|&i| &self.entries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Schema {
        Schema::new()
            .with_field(FieldSchema::boolean("verbose").with_short('v'))
            .with_field(FieldSchema::object(
                "database",
                vec![
                    FieldSchema::string("host").with_short('H'),
                    FieldSchema::number("maxRetries"),
                ],
            ))
    }

    #[test]
    fn test_flatten_keeps_declaration_order() {
        let options = OptionsSchema::new(nested()).unwrap();
        let flags: Vec<&str> = options.entries().iter().map(|e| e.flag.as_str()).collect();
        assert_eq!(flags, vec!["verbose", "database.host", "database.max-retries"]);
    }

    #[test]
    fn test_find_nested_long_flag() {
        let options = OptionsSchema::new(nested()).unwrap();
        let entry = options.find_long("database.maxRetries").unwrap();
        assert_eq!(
            entry.path.segments(),
            &["database".to_string(), "maxRetries".to_string()]
        );
        assert_eq!(options.find_short('H').unwrap().flag, "database.host");
    }

    #[test]
    fn test_objects_are_not_options() {
        let options = OptionsSchema::new(nested()).unwrap();
        assert!(options.find_long("database").is_none());
    }

    #[test]
    fn test_construction_fails_on_alias_collision() {
        let schema = Schema::new()
            .with_field(FieldSchema::boolean("verbose").with_short('v'))
            .with_field(FieldSchema::boolean("version").with_short('v'));

        let err = OptionsSchema::new(schema).unwrap_err();
        assert_eq!(
            err.to_string(),
            "short alias -v is declared by both verbose and version"
        );
    }
}
