use serde::{Deserialize, Serialize};

use crate::{OptionsSchema, Schema, SchemaError, ValuesSchema, VariadicPolicy};

/// Field list plus leftover policy for an `options` or `values` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseDef {
    /// Policy for leftover positional tokens.
    #[serde(default)]
    pub variadic: VariadicPolicy,
    /// Declared fields.
    #[serde(default)]
    pub fields: Schema,
}

impl ParseDef {
    pub fn new(fields: Schema) -> Self {
        Self {
            variadic: VariadicPolicy::default(),
            fields,
        }
    }

    /// Builds the option table.
    pub fn to_options(&self) -> Result<OptionsSchema, SchemaError> {
        Ok(OptionsSchema::new(self.fields.clone())?.with_variadic(self.variadic))
    }

    /// Builds the positional list.
    pub fn to_values(&self) -> Result<ValuesSchema, SchemaError> {
        Ok(ValuesSchema::new(self.fields.clone())?.with_variadic(self.variadic))
    }
}

/// Declarative command tree.
///
/// A command either dispatches to sub-commands, parses options, binds
/// positional values, or (with none of those) accepts no arguments at all.
/// Definitions are usually loaded from YAML or JSON files and checked with
/// [`validate_definition`](crate::validate_definition).
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let def: CommandDef = serde_json::from_value(serde_json::json!({
///     "name": "chat",
///     "commands": [
///         {
///             "name": "login",
///             "description": "Log in to the server",
///             "options": {"fields": [{"name": "username", "type": "string", "required": true}]}
///         },
///         {
///             "name": "message",
///             "values": {"fields": [{"name": "text", "type": "string", "required": true}]}
///         }
///     ]
/// }))
/// .unwrap();
///
/// assert!(matches!(def.body().unwrap(), CommandBody::Commands(subs) if subs.len() == 2));
/// assert!(validate_definition(&def).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandDef {
    /// Command name as declared; matched case-insensitively in kebab form.
    pub name: String,
    /// Text shown next to the command in its parent's listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sub-commands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDef>,
    /// Flagged options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ParseDef>,
    /// Positional values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<ParseDef>,
}

/// What a [`CommandDef`] does with its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandBody<'a> {
    Commands(&'a [CommandDef]),
    Options(&'a ParseDef),
    Values(&'a ParseDef),
    Empty,
}

impl CommandDef {
    /// Creates a command that accepts no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Resolves which body this command declares.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictingBody`](SchemaError::ConflictingBody) when more
    /// than one of `commands`, `options` and `values` is set.
    pub fn body(&self) -> Result<CommandBody<'_>, SchemaError> {
        match (&self.commands[..], &self.options, &self.values) {
            ([], None, None) => Ok(CommandBody::Empty),
            (subs, None, None) => Ok(CommandBody::Commands(subs)),
            ([], Some(options), None) => Ok(CommandBody::Options(options)),
            ([], None, Some(values)) => Ok(CommandBody::Values(values)),
            _ => Err(SchemaError::ConflictingBody(self.name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldKind, FieldSchema};

    #[test]
    fn test_definition_from_yaml() {
        let yaml = r#"
name: chat
description: Chat client
commands:
  - name: login
    options:
      variadic: allow
      fields:
        - name: username
          type: string
          short: u
  - name: logout
"#;
        let def: CommandDef = serde_yaml::from_str(yaml).unwrap();
        let CommandBody::Commands(subs) = def.body().unwrap() else {
            panic!("expected commands");
        };
        assert_eq!(subs[0].name, "login");

        let CommandBody::Options(options) = subs[0].body().unwrap() else {
            panic!("expected options");
        };
        assert_eq!(options.variadic, VariadicPolicy::Allow);
        assert_eq!(options.fields.fields[0].kind, FieldKind::String);
        assert_eq!(options.fields.fields[0].short, Some('u'));
        assert_eq!(subs[1].body().unwrap(), CommandBody::Empty);
    }

    #[test]
    fn test_body_rejects_options_and_values() {
        let mut def = CommandDef::new("broken");
        def.options = Some(ParseDef::default());
        def.values = Some(ParseDef::default());
        assert_eq!(
            def.body().unwrap_err(),
            SchemaError::ConflictingBody("broken".into())
        );
    }

    #[test]
    fn test_parse_def_builds_checked_tables() {
        let def = ParseDef {
            variadic: VariadicPolicy::Ignore,
            fields: Schema::new().with_field(FieldSchema::string("name").required()),
        };
        assert_eq!(def.to_options().unwrap().variadic(), VariadicPolicy::Ignore);
        assert_eq!(def.to_values().unwrap().variadic(), VariadicPolicy::Ignore);
    }
}
