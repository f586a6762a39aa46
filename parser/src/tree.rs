//! Parsing against a declarative command tree.
//!
//! A [`CommandDef`] loaded from a file drives the same resolvers a
//! hand-written parser would call: sub-commands dispatch, `options` and
//! `values` bodies resolve, and a command without a body accepts nothing.

use command_args_core::{CommandBody, CommandDef, validate_definition};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::command::{Command, Commands};
use crate::context::Context;
use crate::error::Result;
use crate::parsed::Parsed;

/// What a parse against a definition tree resolved to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Invocation {
    /// Matched sub-command keys, outermost first.
    pub command: Vec<String>,
    /// Validated data of the terminal command.
    pub data: Map<String, Value>,
    /// Leftover positional tokens.
    pub rest: Vec<String>,
    /// Text after `--`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_options: Option<String>,
}

impl Invocation {
    fn new(command: Vec<String>, parsed: Parsed) -> Self {
        Self {
            command,
            data: parsed.data,
            rest: parsed.rest,
            non_options: parsed.non_options,
        }
    }
}

/// Resolves `ctx` against `def` without re-validating the tree.
///
/// # Errors
///
/// Any [`CliError`](crate::CliError) raised by the resolvers, including
/// [`Schema`](crate::CliError::Schema) for a malformed level.
pub fn dispatch(ctx: Context, def: &CommandDef) -> Result<Invocation> {
    match def.body()? {
        CommandBody::Commands(subs) => {
            let commands = subs.iter().fold(Commands::new(), |commands, sub| {
                let mut command = Command::new(sub.name.clone(), move |ctx| dispatch(ctx, sub));
                if let Some(description) = &sub.description {
                    command = command.with_description(description.clone());
                }
                commands.with(command)
            });
            ctx.command(&commands)
        }
        CommandBody::Options(parse) => {
            let schema = parse.to_options()?;
            let command = ctx.command_path().to_vec();
            let parsed = ctx.options(&schema)?;
            Ok(Invocation::new(command, parsed))
        }
        CommandBody::Values(parse) => {
            let schema = parse.to_values()?;
            let command = ctx.command_path().to_vec();
            let parsed = ctx.values(&schema)?;
            Ok(Invocation::new(command, parsed))
        }
        CommandBody::Empty => {
            let command = ctx.command_path().to_vec();
            ctx.empty()?;
            Ok(Invocation {
                command,
                ..Invocation::default()
            })
        }
    }
}

/// Validates `def` as a whole, then resolves `ctx` against it.
///
/// # Examples
///
/// ```
/// use command_args::{Context, run_definition};
/// use command_args_core::CommandDef;
/// use serde_json::json;
///
/// let def: CommandDef = serde_json::from_value(json!({
///     "name": "chat",
///     "commands": [
///         {"name": "sendMessage", "values": {"fields": [
///             {"name": "text", "type": "string", "required": true}
///         ]}}
///     ]
/// }))
/// .unwrap();
///
/// let invocation = run_definition(Context::new("chat", ["send-message", "hi"]), &def).unwrap();
/// assert_eq!(invocation.command, ["send-message"]);
/// assert_eq!(invocation.data["text"], json!("hi"));
/// ```
pub fn run_definition(ctx: Context, def: &CommandDef) -> Result<Invocation> {
    if let Some(error) = validate_definition(def).into_iter().next() {
        return Err(error.into());
    }
    dispatch(ctx, def)
}
