//! Sub-command dispatch.

use std::collections::BTreeMap;
use std::fmt;

use command_args_core::{SchemaError, command_key};
use tracing::debug;

use crate::context::Context;
use crate::error::{CliError, Result, UsageError};
use crate::help::{Row, Section};

type Handler<'a, T> = Box<dyn Fn(Context) -> Result<T> + 'a>;

/// A named sub-command and the handler that parses the rest of the line.
pub struct Command<'a, T> {
    name: String,
    description: Option<String>,
    handler: Handler<'a, T>,
}

impl<'a, T> Command<'a, T> {
    pub fn new(name: impl Into<String>, handler: impl Fn(Context) -> Result<T> + 'a) -> Self {
        Self {
            name: name.into(),
            description: None,
            handler: Box::new(handler),
        }
    }

    /// Text shown in the parent's command listing.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> fmt::Debug for Command<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Command table for one level of the tree.
///
/// # Examples
///
/// ```
/// use command_args::{CliError, Command, Commands, Context};
///
/// let commands = Commands::new()
///     .with(Command::new("login", |ctx: Context| ctx.empty().map(|_| "login")))
///     .with(Command::new("sendMessage", |ctx: Context| ctx.empty().map(|_| "send")));
///
/// let picked = Context::new("chat", ["SEND-MESSAGE"]).command(&commands).unwrap();
/// assert_eq!(picked, "send");
///
/// let err = Context::new("chat", Vec::<String>::new()).command(&commands).unwrap_err();
/// assert!(matches!(err, CliError::Help(_)));
/// ```
#[derive(Debug)]
pub struct Commands<'a, T> {
    commands: Vec<Command<'a, T>>,
}

impl<T> Default for Commands<'_, T> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<'a, T> Commands<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command.
    pub fn with(mut self, command: Command<'a, T>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands keyed by lookup key, in listing order.
    fn table(
        &self,
        invocation: &[String],
    ) -> std::result::Result<BTreeMap<String, &Command<'a, T>>, SchemaError> {
        let mut table = BTreeMap::new();
        for command in &self.commands {
            if command.name.trim().is_empty() {
                return Err(SchemaError::EmptyCommandName);
            }
            let key = command_key(&command.name);
            if table.contains_key(&key) {
                let mut path = invocation.to_vec();
                path.push(key);
                return Err(SchemaError::DuplicateCommand(path.join(" ")));
            }
            table.insert(key, command);
        }
        Ok(table)
    }
}

impl Context {
    /// Dispatches on the first remaining argument.
    ///
    /// With no arguments, or a leading `--help`, returns the command listing
    /// as [`CliError::Help`]. The matched handler runs with a child context
    /// over the remaining arguments.
    ///
    /// # Errors
    ///
    /// - [`CliError::Schema`] when two names fold to the same key.
    /// - [`CliError::Usage`] with [`UsageError::UnknownCommand`] for an
    ///   unknown name.
    /// - Whatever the handler returns, unchanged. Handler failures are logged
    ///   once, when reported.
    pub fn command<T>(mut self, commands: &Commands<'_, T>) -> Result<T> {
        let table = commands.table(self.invocation())?;

        let title = self.strings().command_placeholder.clone();
        self.push_placeholder(&title);
        let rows = table
            .iter()
            .map(|(key, command)| {
                let description = command
                    .description
                    .as_deref()
                    .map(|d| d.lines().map(str::to_string).collect())
                    .unwrap_or_default();
                Row::new(key.clone(), description)
            })
            .collect();
        let help = self.page(Some(Section {
            title: self.strings().commands_title.clone(),
            rows,
        }));

        let Some(token) = self.args().first() else {
            return Err(CliError::Help(help));
        };
        if self.wants_help() {
            return Err(CliError::Help(help));
        }

        // Option-shaped tokens never name a command, even if they fold to one.
        let key = command_key(token);
        let found = if token.starts_with('-') { None } else { table.get(&key) };
        let Some(command) = found else {
            let error = UsageError::UnknownCommand(token.clone());
            return Err(self.usage_error(help, error));
        };

        debug!(depth = self.depth(), command = %key, "dispatching");
        let child = self.child(&key, self.args()[1..].to_vec());
        (command.handler)(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;

    fn chat() -> Commands<'static, &'static str> {
        Commands::new()
            .with(Command::new("message", |_| Ok("message")).with_description("Send a message"))
            .with(Command::new("login", |_| Ok("login")).with_description("Log in"))
    }

    #[test]
    fn test_no_arguments_lists_sorted() {
        let err = Context::new("chat", Vec::<String>::new())
            .command(&chat())
            .unwrap_err();
        assert_eq!(err.exit_code(), 0);
        assert_eq!(
            err.help().unwrap().to_string(),
            [
                "Usage: chat <command>",
                "",
                "Commands:",
                "  login    Log in",
                "  message  Send a message",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = Context::new("chat", ["send"]).command(&chat()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.usage_error(),
            Some(&UsageError::UnknownCommand("send".into()))
        );
        assert_eq!(
            err.help().unwrap().error.as_deref(),
            Some("Error: Command not found: send")
        );
    }

    #[test]
    fn test_option_shaped_token_is_not_a_command() {
        for token in ["--login", "-login", "--message", "-"] {
            let err = Context::new("chat", [token]).command(&chat()).unwrap_err();
            assert_eq!(
                err.usage_error(),
                Some(&UsageError::UnknownCommand(token.into())),
                "token {token}"
            );
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_table_accessors() {
        let commands = chat();
        assert_eq!(commands.len(), 2);
        assert!(!commands.is_empty());
        assert!(Commands::<()>::new().is_empty());

        let table = commands.table(&["chat".to_string()]).unwrap();
        let names: Vec<&str> = table.values().map(|command| command.name()).collect();
        assert_eq!(names, ["login", "message"]);
    }

    #[test]
    fn test_child_context() {
        let commands: Commands<'_, (usize, Vec<String>, Vec<String>)> =
            Commands::new().with(Command::new("remote", |ctx: Context| {
                Ok((ctx.depth(), ctx.invocation().to_vec(), ctx.args().to_vec()))
            }));
        let (depth, invocation, args) = Context::new("git", ["remote", "add", "origin"])
            .command(&commands)
            .unwrap();
        assert_eq!(depth, 1);
        assert_eq!(invocation, ["git", "remote"]);
        assert_eq!(args, ["add", "origin"]);
    }

    #[test]
    fn test_nested_help_usage() {
        let inner = Commands::new().with(Command::new("add", |_| Ok(())));
        let outer = Commands::new().with(Command::new("remote", |ctx: Context| ctx.command(&inner)));
        let err = Context::new("git", ["remote", "--help"])
            .command(&outer)
            .unwrap_err();
        assert_eq!(err.help().unwrap().usage, "Usage: git remote <command>");
    }

    #[test]
    fn test_duplicate_after_folding() {
        let commands = Commands::new()
            .with(Command::new("sendMessage", |_| Ok(())))
            .with(Command::new("send-message", |_| Ok(())));
        let err = Context::new("chat", ["x"]).command(&commands).unwrap_err();
        assert!(matches!(
            err,
            CliError::Schema(SchemaError::DuplicateCommand(path)) if path == "chat send-message"
        ));
    }

    #[test]
    fn test_handler_failure_propagates() {
        let commands = Commands::new().with(Command::new("sync", |_| -> Result<()> {
            let failure: BoxError = "remote hung up".into();
            Err(CliError::Handler(failure))
        }));
        let err = Context::new("app", ["sync"]).command(&commands).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "command failed: remote hung up");
    }
}
