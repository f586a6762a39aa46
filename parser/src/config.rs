//! Parser configuration and command definition files.

use std::io::BufReader;
use std::path::Path;

use command_args_core::CommandDef;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strings::{Placeholder, Strings};

/// Presentation settings applied to every level of a parse.
///
/// Every key is optional in the file.
///
/// # Example
///
/// ```yaml
/// placeholder: "[]"
/// color: true
/// strings:
///   commands_title: "Available commands:"
///   command_not_found: "No such command: <command>"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Usage placeholder delimiters.
    pub placeholder: Placeholder,
    /// Help and error message templates.
    pub strings: Strings,
    /// Style error lines even when the output is not a terminal.
    pub color: bool,
}

impl ParserConfig {
    /// Loads configuration from a YAML (or JSON) file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConfigError::Io) if the file cannot be read, or
    /// [`Yaml`](ConfigError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Loads a command definition tree from a YAML (or JSON) file.
///
/// The tree is not validated here; see
/// [`validate_definition`](command_args_core::validate_definition).
pub fn load_definition(path: impl AsRef<Path>) -> Result<CommandDef, ConfigError> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let def = serde_yaml::from_reader(reader)?;
    Ok(def)
}
