//! Per-level parser state.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use command_args_core::{SchemaValidator, Validator};

use crate::config::ParserConfig;
use crate::error::{CliError, UsageError};
use crate::help::{HelpPage, Section, usage_line};
use crate::strings::{Placeholder, Strings};

const HELP_FLAG: &str = "--help";

/// Settings shared by every level of one parse.
#[derive(Clone)]
pub struct Settings {
    pub placeholder: Placeholder,
    pub strings: Strings,
    pub validator: Arc<dyn Validator>,
}

impl Settings {
    /// Attaches the rendered error line to `help` and wraps both.
    pub(crate) fn usage_error(&self, help: HelpPage, error: UsageError) -> CliError {
        let line = self.strings.error_line(&error);
        CliError::Usage {
            error,
            help: help.with_error(line),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            placeholder: Placeholder::default(),
            strings: Strings::default(),
            validator: Arc::new(SchemaValidator),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("placeholder", &self.placeholder)
            .field("strings", &self.strings)
            .finish_non_exhaustive()
    }
}

/// Arguments and help state for one recursion level.
///
/// A context is consumed by exactly one resolver:
/// [`command`](Context::command), [`options`](Context::options),
/// [`values`](Context::values) or [`empty`](Context::empty). The command
/// dispatcher hands each handler a child context holding the remaining
/// arguments, one level deeper.
///
/// # Examples
///
/// ```
/// use command_args::Context;
///
/// let ctx = Context::new("app", ["login", "--user", "ann"]);
/// assert_eq!(ctx.depth(), 0);
/// assert_eq!(ctx.args(), ["login", "--user", "ann"]);
/// assert_eq!(ctx.invocation(), ["app"]);
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    args: Vec<String>,
    depth: usize,
    invocation: Vec<String>,
    usage: Vec<String>,
    settings: Arc<Settings>,
}

impl Context {
    /// Creates a root context for `program` over `args` (without the
    /// program name itself).
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        Self {
            args: args.into_iter().map(Into::into).collect(),
            depth: 0,
            invocation: vec![program.clone()],
            usage: vec![program],
            settings: Arc::new(Settings::default()),
        }
    }

    /// Creates a root context from the process arguments; the program name
    /// is the file stem of `argv[0]`.
    pub fn from_env() -> Self {
        let mut argv = std::env::args();
        let program = argv
            .next()
            .as_deref()
            .and_then(|arg0| Path::new(arg0).file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        Self::new(program, argv)
    }

    /// Applies placeholder delimiters and string overrides.
    pub fn with_config(mut self, config: &ParserConfig) -> Self {
        let settings = Arc::make_mut(&mut self.settings);
        settings.placeholder = config.placeholder;
        settings.strings = config.strings.clone();
        self
    }

    /// Replaces the validator used by [`options`](Context::options) and
    /// [`values`](Context::values).
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        Arc::make_mut(&mut self.settings).validator = Arc::new(validator);
        self
    }

    /// Arguments not consumed by an ancestor.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Recursion level; 0 at the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Program name followed by the command names matched so far.
    pub fn invocation(&self) -> &[String] {
        &self.invocation
    }

    /// Command names matched so far, without the program name.
    pub fn command_path(&self) -> &[String] {
        &self.invocation[1..]
    }

    pub(crate) fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub(crate) fn strings(&self) -> &Strings {
        &self.settings.strings
    }

    pub(crate) fn placeholder(&self) -> Placeholder {
        self.settings.placeholder
    }

    pub(crate) fn validator(&self) -> &dyn Validator {
        self.settings.validator.as_ref()
    }

    /// `true` when the first unconsumed token is `--help`.
    pub(crate) fn wants_help(&self) -> bool {
        self.args.first().is_some_and(|a| a == HELP_FLAG)
    }

    /// Appends a bracketed usage fragment.
    pub(crate) fn push_placeholder(&mut self, name: &str) {
        let fragment = self.settings.placeholder.wrap(name);
        self.usage.push(fragment);
    }

    /// Help page for this level with the given body.
    pub(crate) fn page(&self, section: Option<Section>) -> HelpPage {
        let usage = usage_line(self.strings(), &self.invocation, &self.usage);
        HelpPage {
            usage,
            section,
            error: None,
        }
    }

    pub(crate) fn usage_error(&self, help: HelpPage, error: UsageError) -> CliError {
        self.settings.usage_error(help, error)
    }

    /// Context for the handler of `command`, over `args`.
    pub(crate) fn child(&self, command: &str, args: Vec<String>) -> Context {
        let mut invocation = self.invocation.clone();
        invocation.push(command.to_string());
        Context {
            args,
            depth: self.depth + 1,
            usage: invocation.clone(),
            invocation,
            settings: Arc::clone(&self.settings),
        }
    }
}
