//! Positional ("values") resolution and the empty resolver.

use command_args_core::ValuesSchema;
use serde_json::{Map, Value};
use tracing::debug;

use crate::context::Context;
use crate::error::{CliError, Result, UsageError};
use crate::help::{Section, value_rows};
use crate::options::{apply_policy, validation_error};
use crate::parsed::Parsed;

impl Context {
    /// Binds the remaining arguments to the schema's fields by position.
    ///
    /// Missing tokens are left to the validator, which applies defaults or
    /// reports the field as required. Tokens beyond the last field go
    /// through the schema's variadic policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args::Context;
    /// use command_args_core::{FieldSchema, Schema, ValuesSchema};
    /// use serde_json::json;
    ///
    /// let schema = ValuesSchema::new(
    ///     Schema::new()
    ///         .with_field(FieldSchema::string("name").required())
    ///         .with_field(FieldSchema::string("greeting").with_default("Hello")),
    /// )
    /// .unwrap();
    ///
    /// let parsed = Context::new("greet", ["Ann"]).values(&schema).unwrap();
    /// assert_eq!(parsed.get("name"), Some(&json!("Ann")));
    /// assert_eq!(parsed.get("greeting"), Some(&json!("Hello")));
    /// ```
    pub fn values(mut self, schema: &ValuesSchema) -> Result<Parsed> {
        for name in schema.names() {
            self.push_placeholder(name);
        }
        let help = self.page(Some(Section {
            title: self.strings().arguments_title.clone(),
            rows: value_rows(schema, self.strings(), self.placeholder()),
        }));

        if self.wants_help() {
            return Err(CliError::Help(help));
        }

        let mut raw = Map::new();
        for (field, token) in schema.schema().iter().zip(self.args()) {
            raw.insert(field.name.clone(), Value::String(token.clone()));
        }
        let surplus: Vec<String> = self.args().iter().skip(schema.schema().len()).cloned().collect();
        debug!(depth = self.depth(), bound = raw.len(), surplus = surplus.len(), "bound positional values");

        let data = match self.validator().validate(&raw, schema.schema()) {
            Ok(data) => data,
            Err(errors) => return Err(self.usage_error(help, validation_error(&errors))),
        };

        let rest = match apply_policy(schema.variadic(), surplus) {
            Ok(rest) => rest,
            Err(error) => return Err(self.usage_error(help, error)),
        };

        Ok(Parsed::new(data, rest, None, help, self.settings().clone()))
    }

    /// Accepts no arguments at all. Only `--help` is recognized.
    pub fn empty(self) -> Result<()> {
        let help = self.page(None);
        if self.wants_help() {
            return Err(CliError::Help(help));
        }
        match self.args().first() {
            Some(token) => {
                let error = UsageError::UnexpectedArgument(token.clone());
                Err(self.usage_error(help, error))
            }
            None => Ok(()),
        }
    }
}
