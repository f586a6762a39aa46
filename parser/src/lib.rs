//! Schema-driven command-line parsing with recursive sub-commands.
//!
//! A parse starts from one root [`Context`] holding the process arguments.
//! Each level calls exactly one resolver on its context:
//!
//! - [`Context::command`]: dispatches the first token to a handler in a
//!   [`Commands`] table, which receives a child context one level deeper.
//! - [`Context::options`]: resolves `--long` and `-s` options against an
//!   [`OptionsSchema`](command_args_core::OptionsSchema).
//! - [`Context::values`]: binds positional tokens to a
//!   [`ValuesSchema`](command_args_core::ValuesSchema).
//! - [`Context::empty`]: accepts nothing.
//!
//! Every resolver contributes to the level's [`HelpPage`]. Help requests and
//! user errors come back as [`CliError`] values carrying that page; only the
//! outer shell ([`run`] or [`CliError::exit`]) prints and exits.
//!
//! Command trees can also be declared in YAML or JSON and parsed with
//! [`run_definition`].
//!
//! # Example
//!
//! ```
//! use command_args::*;
//! use command_args_core::{FieldSchema, OptionsSchema, Schema};
//! use serde_json::json;
//!
//! let login = OptionsSchema::new(
//!     Schema::new()
//!         .with_field(FieldSchema::string("username").required())
//!         .with_field(FieldSchema::string("password").required().with_len("6-".parse().unwrap())),
//! )
//! .unwrap();
//!
//! let commands = Commands::new()
//!     .with(Command::new("login", |ctx: Context| ctx.options(&login)).with_description("Log in"));
//!
//! let ctx = Context::new("chat", ["login", "--username", "alice", "--password", "secret1"]);
//! let parsed = ctx.command(&commands).unwrap();
//! assert_eq!(parsed.get("username"), Some(&json!("alice")));
//! assert!(parsed.rest.is_empty());
//! assert!(parsed.non_options.is_none());
//! ```

mod command;
mod config;
mod context;
mod error;
mod help;
mod options;
mod parsed;
mod printer;
mod strings;
mod tokenize;
mod tree;
mod values;

pub use command::{Command, Commands};
pub use config::{ParserConfig, load_definition};
pub use context::{Context, Settings};
pub use error::{BoxError, CliError, ConfigError, Result, UsageError};
pub use help::{HelpPage, Row, Section};
pub use parsed::Parsed;
pub use printer::{Printer, pad_to};
pub use strings::{Placeholder, Strings, render_template};
pub use tokenize::{NON_OPTION_SEPARATOR, Token, split_non_options};
pub use tree::{Invocation, dispatch, run_definition};

/// Parses the process arguments with `parse` and returns its value.
///
/// Help requests and errors are printed and end the process with
/// [`CliError::exit_code`].
pub fn run<T>(parse: impl FnOnce(Context) -> Result<T>) -> T {
    match parse(Context::from_env()) {
        Ok(value) => value,
        Err(error) => error.exit(),
    }
}
