use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::context::Settings;
use crate::error::{CliError, Result, UsageError};
use crate::help::HelpPage;

/// Validated data returned by [`Context::options`](crate::Context::options)
/// and [`Context::values`](crate::Context::values).
#[derive(Debug, Clone)]
pub struct Parsed {
    /// Validated data object.
    pub data: Map<String, Value>,
    /// Leftover positional tokens (only kept under the `allow` policy).
    pub rest: Vec<String>,
    /// Tokens after `--`, joined with single spaces; `None` without `--`.
    pub non_options: Option<String>,
    /// Tokens after `--`, unjoined.
    pub trailing: Vec<String>,
    help: HelpPage,
    settings: Arc<Settings>,
}

impl Parsed {
    pub(crate) fn new(
        data: Map<String, Value>,
        rest: Vec<String>,
        trailing: Option<Vec<String>>,
        help: HelpPage,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            data,
            rest,
            non_options: trailing.as_ref().map(|t| t.join(" ")),
            trailing: trailing.unwrap_or_default(),
            help,
            settings,
        }
    }

    /// Looks up a top-level value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Help page of the level that produced this result.
    pub fn help(&self) -> &HelpPage {
        &self.help
    }

    /// Reports a caller-detected problem with this level's help attached.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args::*;
    /// use command_args_core::{FieldSchema, OptionsSchema, Schema};
    ///
    /// let schema = OptionsSchema::new(Schema::new().with_field(FieldSchema::number("port"))).unwrap();
    /// let parsed = Context::new("serve", ["--port", "80"]).options(&schema).unwrap();
    ///
    /// let err = parsed.fail("port 80 needs root");
    /// assert_eq!(err.exit_code(), 1);
    /// assert_eq!(err.help().unwrap().error.as_deref(), Some("Error: port 80 needs root"));
    /// ```
    pub fn fail(&self, message: impl Into<String>) -> CliError {
        self.settings
            .usage_error(self.help.clone(), UsageError::Custom(message.into()))
    }

    /// Deserializes the data object into a typed value.
    ///
    /// A mismatch between the schema and `T` is a programming error and is
    /// reported as a handler failure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(CliError::handler)
    }
}
