//! Overridable help and error strings.
//!
//! Every literal the parser prints comes from [`Strings`]. Templates
//! substitute `<key>` tokens; unknown keys are left as written so a
//! template may still contain literal angle brackets.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::UsageError;

static TEMPLATE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z_][A-Za-z0-9_]*)>").expect("valid template regex"));

/// Substitutes `<key>` tokens in `template`.
///
/// # Examples
///
/// ```
/// use command_args::render_template;
///
/// let line = render_template("Usage: <base> <extra>", &[("base", "app login")]);
/// assert_eq!(line, "Usage: app login <extra>");
/// ```
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    TEMPLATE_VAR
        .replace_all(template, |caps: &Captures<'_>| {
            vars.iter()
                .find(|(key, _)| *key == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

/// Delimiter pair used to bracket usage placeholders (`<command>`).
///
/// Written as a two-character string in configuration files (`"[]"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Placeholder {
    pub open: char,
    pub close: char,
}

impl Placeholder {
    /// Wraps `name` in the delimiters.
    pub fn wrap(&self, name: &str) -> String {
        format!("{}{name}{}", self.open, self.close)
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            open: '<',
            close: '>',
        }
    }
}

impl TryFrom<String> for Placeholder {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(open), Some(close), None) => Ok(Self { open, close }),
            _ => Err(format!(
                "placeholder must be exactly two characters, got `{value}`"
            )),
        }
    }
}

impl From<Placeholder> for String {
    fn from(placeholder: Placeholder) -> Self {
        [placeholder.open, placeholder.close].iter().collect()
    }
}

/// Message templates.
///
/// Missing keys in a configuration file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    /// Usage line. Vars: `<usage>` (all fragments), `<base>` (invocation).
    pub usage: String,
    pub commands_title: String,
    pub options_title: String,
    pub arguments_title: String,
    /// Usage fragment name for the sub-command slot.
    pub command_placeholder: String,
    /// Usage fragment name for the options slot.
    pub options_placeholder: String,
    /// Vars: `<value>`.
    pub default_value: String,
    pub required: String,
    /// Vars: `<values>`.
    pub one_of: String,
    /// Trailing error line. Vars: `<message>`.
    pub error: String,
    /// Vars: `<option>`.
    pub unknown_option: String,
    /// Vars: `<option>`.
    pub missing_argument: String,
    /// Vars: `<argument>`.
    pub unexpected_argument: String,
    /// Vars: `<command>`.
    pub command_not_found: String,
    /// Vars: `<option>`, `<message>`.
    pub validation: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            usage: "Usage: <usage>".into(),
            commands_title: "Commands:".into(),
            options_title: "Options:".into(),
            arguments_title: "Arguments:".into(),
            command_placeholder: "command".into(),
            options_placeholder: "options".into(),
            default_value: "(default: <value>)".into(),
            required: "(required)".into(),
            one_of: "one of: <values>".into(),
            error: "Error: <message>".into(),
            unknown_option: "Unknown option: <option>".into(),
            missing_argument: "Missing argument for option: <option>".into(),
            unexpected_argument: "Unexpected argument: <argument>".into(),
            command_not_found: "Command not found: <command>".into(),
            validation: "<option>: <message>".into(),
        }
    }
}

impl Strings {
    /// User-facing text for a usage error.
    pub fn describe(&self, error: &UsageError) -> String {
        match error {
            UsageError::UnknownOption(option) => {
                render_template(&self.unknown_option, &[("option", option.as_str())])
            }
            UsageError::MissingArgument(option) => {
                render_template(&self.missing_argument, &[("option", option.as_str())])
            }
            UsageError::UnexpectedArgument(argument) => {
                render_template(&self.unexpected_argument, &[("argument", argument.as_str())])
            }
            UsageError::UnknownCommand(command) => {
                render_template(&self.command_not_found, &[("command", command.as_str())])
            }
            UsageError::Validation { option, message } => render_template(
                &self.validation,
                &[("option", option.as_str()), ("message", message.as_str())],
            ),
            UsageError::Custom(message) => message.clone(),
        }
    }

    /// Full trailing error line for a usage error.
    pub fn error_line(&self, error: &UsageError) -> String {
        render_template(&self.error, &[("message", self.describe(error).as_str())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_vars_are_kept() {
        assert_eq!(
            render_template("<a> and <b>", &[("a", "x")]),
            "x and <b>"
        );
    }

    #[test]
    fn test_placeholder_parsing() {
        let p = Placeholder::try_from("[]".to_string()).unwrap();
        assert_eq!(p.wrap("command"), "[command]");
        assert!(Placeholder::try_from("<".to_string()).is_err());
        assert!(Placeholder::try_from("<<>".to_string()).is_err());
        assert_eq!(String::from(Placeholder::default()), "<>");
    }

    #[test]
    fn test_describe_uses_overrides() {
        let strings = Strings {
            command_not_found: "Kein Befehl: <command>".into(),
            error: "Fehler: <message>".into(),
            ..Strings::default()
        };
        let error = UsageError::UnknownCommand("send".into());
        assert_eq!(strings.error_line(&error), "Fehler: Kein Befehl: send");
    }

    #[test]
    fn test_validation_line() {
        let error = UsageError::Validation {
            option: "password".into(),
            message: "is required".into(),
        };
        assert_eq!(
            Strings::default().error_line(&error),
            "Error: password: is required"
        );
    }
}
