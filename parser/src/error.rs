//! Error types for parsing and dispatch.
//!
//! [`CliError`] is what every resolver returns instead of terminating the
//! process. Only [`CliError::exit`] (and [`run`](crate::run)) end the
//! process, which keeps the engine testable without process-level side
//! effects.

use std::error::Error as _;
use std::io::{self, Write};

use command_args_core::SchemaError;
use thiserror::Error;

use crate::help::HelpPage;
use crate::printer::Printer;

/// Boxed error returned by command handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// User-input errors. Each is shown after the help of the level where it
/// occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Token does not resolve to any declared option or alias.
    #[error("unknown option: {0}")]
    UnknownOption(String),
    /// Value-taking option without a usable following token.
    #[error("missing argument for option: {0}")]
    MissingArgument(String),
    /// Leftover positional token under the `deny` policy.
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
    /// Leading token does not name a declared sub-command.
    #[error("command not found: {0}")]
    UnknownCommand(String),
    /// Validator rejected the assembled data.
    #[error("{option}: {message}")]
    Validation { option: String, message: String },
    /// Raised by the caller through [`Parsed::fail`](crate::Parsed::fail).
    #[error("{0}")]
    Custom(String),
}

/// Outcome of a parse that did not produce data.
#[derive(Debug, Error)]
pub enum CliError {
    /// Help was requested, or no sub-command was given. Exit status 0.
    #[error("help requested")]
    Help(HelpPage),
    /// User-input error, with the help page of the failing level.
    #[error("{error}")]
    Usage { error: UsageError, help: HelpPage },
    /// The interface definition itself is broken.
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),
    /// A command handler failed.
    #[error("command failed: {0}")]
    Handler(#[source] BoxError),
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Wraps a handler failure.
    pub fn handler(error: impl Into<BoxError>) -> Self {
        Self::Handler(error.into())
    }

    /// Process exit status: 0 for help, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Help(_) => 0,
            _ => 1,
        }
    }

    /// Help page to show, if this error carries one.
    pub fn help(&self) -> Option<&HelpPage> {
        match self {
            CliError::Help(help) | CliError::Usage { help, .. } => Some(help),
            _ => None,
        }
    }

    /// The user-input error, if any.
    pub fn usage_error(&self) -> Option<&UsageError> {
        match self {
            CliError::Usage { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Prints the error the way the process shell does.
    ///
    /// Requested help goes to `out`; everything else goes to `err`. Handler
    /// failures are printed with their full debug representation and source
    /// chain, and logged once here rather than at every dispatch level.
    pub fn report_to<O: Write, E: Write>(
        &self,
        out: &mut Printer<O>,
        err: &mut Printer<E>,
    ) -> io::Result<()> {
        match self {
            CliError::Help(help) => out.help(help),
            CliError::Usage { help, .. } => err.help(help),
            CliError::Schema(error) => err.error(&format!("error: {error}")),
            CliError::Handler(error) => {
                tracing::error!(error = %error, "command handler failed");
                err.line(&format!("{error:?}"))?;
                let mut source = error.source();
                while let Some(cause) = source {
                    err.line(&format!("caused by: {cause:?}"))?;
                    source = cause.source();
                }
                Ok(())
            }
        }
    }

    /// Prints the error and terminates the process with [`exit_code`].
    ///
    /// [`exit_code`]: CliError::exit_code
    pub fn exit(self) -> ! {
        let code = self.exit_code();
        // Nothing sensible is left to do if stdout/stderr are gone.
        let _ = self.report_to(&mut Printer::stdout(), &mut Printer::stderr());
        std::process::exit(code)
    }
}

/// Errors raised while loading configuration or definition files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML (or JSON) parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
