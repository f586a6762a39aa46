//! Construction-time schema checks.
//!
//! These checks catch mistakes made by the CLI author (duplicate short
//! aliases, non-string positional fields, required positionals after
//! optional ones, colliding command names) before any argument is parsed.
//! They are never routed through help output: a failing check means the
//! interface itself is broken.
//!
//! # Examples
//!
//! ```
//! use command_args_core::*;
//!
//! let schema = Schema::new()
//!     .with_field(FieldSchema::boolean("verbose").with_short('v'))
//!     .with_field(FieldSchema::string("version").with_short('v'));
//!
//! let errors = validate_options(&schema);
//! assert!(matches!(errors[0], SchemaError::DuplicateShortAlias { alias: 'v', .. }));
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::case::{Case, convert};
use crate::definition::CommandDef;
use crate::options::flatten;
use crate::{FieldKind, FieldSchema, Schema};

/// Schema construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field has an empty or whitespace-only name.
    #[error("field name cannot be empty")]
    EmptyFieldName,
    /// Short alias is not a single ASCII letter or digit.
    #[error("invalid short alias: -{0}")]
    InvalidShortAlias(char),
    /// Two key-paths claim the same short alias.
    #[error("short alias -{alias} is declared by both {first} and {second}")]
    DuplicateShortAlias {
        alias: char,
        first: String,
        second: String,
    },
    /// Two key-paths produce the same flag.
    #[error("duplicate option: --{0}")]
    DuplicateOption(String),
    /// Enum field without any values.
    #[error("enum field {0} declares no values")]
    EmptyEnum(String),
    /// Positional field with a type other than string.
    #[error("positional field {0} must be a string")]
    NonStringPositional(String),
    /// Required positional field declared after an optional one.
    #[error("required positional field {0} follows an optional one")]
    RequiredAfterOptional(String),
    /// Length bound that does not parse.
    #[error("invalid length range: {0}")]
    InvalidLength(String),
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Two commands in the same table collide after case folding.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    /// A command definition declares more than one of `commands`,
    /// `options` and `values`.
    #[error("command {0} must declare only one of commands, options or values")]
    ConflictingBody(String),
}

/// Checks a schema for use with the option resolver.
///
/// Returns the first problem found, or an empty list.
pub fn validate_options(schema: &Schema) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    errors.extend(validate_fields(&schema.fields));
    if !errors.is_empty() {
        return errors;
    }

    let mut flags: HashSet<String> = HashSet::new();
    let mut shorts: HashMap<char, String> = HashMap::new();
    for entry in flatten(schema) {
        if !flags.insert(entry.flag.clone()) {
            errors.push(SchemaError::DuplicateOption(entry.flag));
            return errors;
        }

        if let Some(alias) = entry.field.short {
            if !alias.is_ascii_alphanumeric() {
                errors.push(SchemaError::InvalidShortAlias(alias));
                return errors;
            }
            if let Some(first) = shorts.get(&alias) {
                errors.push(SchemaError::DuplicateShortAlias {
                    alias,
                    first: first.clone(),
                    second: entry.path.to_string(),
                });
                return errors;
            }
            shorts.insert(alias, entry.path.to_string());
        }
    }

    errors
}

/// Checks a schema for use with the positional resolver.
///
/// Every field must be a string, and required fields must form a
/// contiguous prefix.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let schema = Schema::new()
///     .with_field(FieldSchema::string("greeting"))
///     .with_field(FieldSchema::string("name").required());
///
/// assert_eq!(
///     validate_values(&schema),
///     vec![SchemaError::RequiredAfterOptional("name".into())]
/// );
/// ```
pub fn validate_values(schema: &Schema) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    errors.extend(validate_fields(&schema.fields));
    if !errors.is_empty() {
        return errors;
    }

    let mut seen_optional = false;
    for field in schema {
        if field.kind != FieldKind::String {
            errors.push(SchemaError::NonStringPositional(field.name.clone()));
            return errors;
        }
        if field.required && seen_optional {
            errors.push(SchemaError::RequiredAfterOptional(field.name.clone()));
            return errors;
        }
        seen_optional |= !field.required;
    }

    errors
}

/// Checks a whole command tree.
///
/// Command names must be non-empty and unique after case folding within
/// each table; every options or values schema in the tree must pass its own
/// checks.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let mut root = CommandDef::new("app");
/// root.commands.push(CommandDef::new("sendMessage"));
/// root.commands.push(CommandDef::new("send-message"));
///
/// assert_eq!(
///     validate_definition(&root),
///     vec![SchemaError::DuplicateCommand("app send-message".into())]
/// );
/// ```
pub fn validate_definition(def: &CommandDef) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if def.name.trim().is_empty() {
        errors.push(SchemaError::EmptyCommandName);
        return errors;
    }

    let mut path = vec![def.name.clone()];
    errors.extend(validate_command(def, &mut path));
    errors
}

fn validate_command(def: &CommandDef, path: &mut Vec<String>) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    let declared = [
        !def.commands.is_empty(),
        def.options.is_some(),
        def.values.is_some(),
    ];
    if declared.iter().filter(|d| **d).count() > 1 {
        errors.push(SchemaError::ConflictingBody(path.join(" ")));
        return errors;
    }

    if let Some(options) = &def.options {
        errors.extend(validate_options(&options.fields));
    }
    if let Some(values) = &def.values {
        errors.extend(validate_values(&values.fields));
    }
    if !errors.is_empty() {
        return errors;
    }

    let mut seen: HashSet<String> = HashSet::new();
    for sub in &def.commands {
        if sub.name.trim().is_empty() {
            errors.push(SchemaError::EmptyCommandName);
            return errors;
        }

        let key = command_key(&sub.name);
        if !seen.insert(key.clone()) {
            let duplicate = path
                .iter()
                .cloned()
                .chain(std::iter::once(key))
                .collect::<Vec<_>>()
                .join(" ");
            errors.push(SchemaError::DuplicateCommand(duplicate));
            return errors;
        }

        path.push(sub.name.clone());
        errors.extend(validate_command(sub, path));
        path.pop();
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Lookup key for a command name: kebab case, lower-cased.
///
/// # Examples
///
/// ```
/// use command_args_core::command_key;
///
/// assert_eq!(command_key("sendMessage"), "send-message");
/// assert_eq!(command_key("SEND-MESSAGE"), "send-message");
/// ```
pub fn command_key(name: &str) -> String {
    convert(name, Case::Kebab).to_lowercase()
}

fn validate_fields(fields: &[FieldSchema]) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    for field in fields {
        if field.name.trim().is_empty() {
            errors.push(SchemaError::EmptyFieldName);
            return errors;
        }
        match &field.kind {
            FieldKind::Enum { values } if values.is_empty() => {
                errors.push(SchemaError::EmptyEnum(field.name.clone()));
                return errors;
            }
            FieldKind::Object { fields } => {
                errors.extend(validate_fields(fields));
                if !errors.is_empty() {
                    return errors;
                }
            }
            _ => {}
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseDef;

    #[test]
    fn test_options_accepts_distinct_aliases() {
        let schema = Schema::new()
            .with_field(FieldSchema::boolean("verbose").with_short('v'))
            .with_field(FieldSchema::string("user").with_short('u'));

        assert!(validate_options(&schema).is_empty());
    }

    #[test]
    fn test_options_rejects_nested_alias_collision() {
        let schema = Schema::new()
            .with_field(FieldSchema::string("host").with_short('h'))
            .with_field(FieldSchema::object(
                "proxy",
                vec![FieldSchema::string("host").with_short('h')],
            ));

        assert_eq!(
            validate_options(&schema),
            vec![SchemaError::DuplicateShortAlias {
                alias: 'h',
                first: "host".into(),
                second: "proxy.host".into(),
            }]
        );
    }

    #[test]
    fn test_options_rejects_flag_collision_across_case() {
        let schema = Schema::new()
            .with_field(FieldSchema::string("dryRun"))
            .with_field(FieldSchema::string("dry_run"));

        assert_eq!(
            validate_options(&schema),
            vec![SchemaError::DuplicateOption("dry-run".into())]
        );
    }

    #[test]
    fn test_options_rejects_bad_alias_and_empty_enum() {
        let schema = Schema::new().with_field(FieldSchema::boolean("quiet").with_short('?'));
        assert_eq!(
            validate_options(&schema),
            vec![SchemaError::InvalidShortAlias('?')]
        );

        let schema =
            Schema::new().with_field(FieldSchema::enumeration("level", Vec::<String>::new()));
        assert_eq!(
            validate_options(&schema),
            vec![SchemaError::EmptyEnum("level".into())]
        );
    }

    #[test]
    fn test_values_rejects_non_string() {
        let schema = Schema::new().with_field(FieldSchema::number("count"));
        assert_eq!(
            validate_values(&schema),
            vec![SchemaError::NonStringPositional("count".into())]
        );
    }

    #[test]
    fn test_values_accepts_required_prefix() {
        let schema = Schema::new()
            .with_field(FieldSchema::string("name").required())
            .with_field(FieldSchema::string("greeting").with_default("Hello"));
        assert!(validate_values(&schema).is_empty());
    }

    #[test]
    fn test_definition_rejects_conflicting_body() {
        let mut def = CommandDef::new("app");
        def.commands.push(CommandDef::new("login"));
        def.options = Some(ParseDef::default());

        assert_eq!(
            validate_definition(&def),
            vec![SchemaError::ConflictingBody("app".into())]
        );
    }

    #[test]
    fn test_definition_checks_nested_schemas() {
        let mut login = CommandDef::new("login");
        login.values = Some(ParseDef::new(
            Schema::new().with_field(FieldSchema::boolean("force")),
        ));
        let mut def = CommandDef::new("app");
        def.commands.push(login);

        assert_eq!(
            validate_definition(&def),
            vec![SchemaError::NonStringPositional("force".into())]
        );
    }
}
