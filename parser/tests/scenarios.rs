//! End-to-end parsing scenarios through the public API.

use std::io;
use std::sync::{Arc, Mutex};

use command_args::*;
use command_args_core::{
    FieldSchema, OptionsSchema, ScalarKind, Schema, SchemaError, ValuesSchema, VariadicPolicy,
};
use serde::Deserialize;
use serde_json::{Value, json};

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn login_schema() -> OptionsSchema {
    OptionsSchema::new(
        Schema::new()
            .with_field(FieldSchema::string("username").required())
            .with_field(
                FieldSchema::string("password")
                    .required()
                    .with_len("6-".parse().unwrap()),
            ),
    )
    .unwrap()
}

fn chat_commands() -> Commands<'static, &'static str> {
    Commands::new()
        .with(Command::new("message", |ctx: Context| ctx.empty().map(|_| "message")))
        .with(Command::new("login", |ctx: Context| ctx.empty().map(|_| "login")))
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn data(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

// ----------------------------------------------------------------------------
// Scenarios
// ----------------------------------------------------------------------------

#[test]
fn test_options_happy_path() {
    let parsed = Context::new("app", ["--username", "alice", "--password", "secret1"])
        .options(&login_schema())
        .unwrap();

    assert_eq!(parsed.data, data(json!({"username": "alice", "password": "secret1"})));
    assert!(parsed.rest.is_empty());
    assert!(parsed.non_options.is_none());
}

#[test]
fn test_missing_required_option() {
    let err = Context::new("app", ["--username", "alice"])
        .options(&login_schema())
        .unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert_eq!(
        err.usage_error(),
        Some(&UsageError::Validation {
            option: "password".into(),
            message: "is required".into(),
        })
    );

    let page = err.help().unwrap().to_string();
    assert!(page.starts_with("Usage: app <options>\n\nOptions:\n"));
    assert!(page.contains("--password <string>"));
    assert!(page.ends_with("\n\nError: password: is required"));
}

#[test]
fn test_short_password_is_rejected() {
    let err = Context::new("app", ["--username", "alice", "--password", "abc"])
        .options(&login_schema())
        .unwrap_err();
    assert_eq!(
        err.usage_error(),
        Some(&UsageError::Validation {
            option: "password".into(),
            message: "must be at least 6 characters".into(),
        })
    );
}

#[test]
fn test_empty_command_list_request() {
    let err = Context::new("chat", Vec::<String>::new())
        .command(&chat_commands())
        .unwrap_err();

    assert_eq!(err.exit_code(), 0);
    let CliError::Help(page) = &err else {
        panic!("expected help, got {err:?}");
    };
    assert_eq!(
        page.body_lines(),
        vec!["Usage: chat <command>", "", "Commands:", "  login", "  message"]
    );
    assert!(page.error.is_none());
}

#[test]
fn test_unknown_command() {
    let err = Context::new("chat", ["send"])
        .command(&chat_commands())
        .unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.usage_error(), Some(&UsageError::UnknownCommand("send".into())));
    assert!(err.help().unwrap().to_string().contains("  login\n  message"));
}

#[test]
fn test_option_shaped_token_does_not_dispatch() {
    let err = Context::new("chat", ["--login"])
        .command(&chat_commands())
        .unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.usage_error(), Some(&UsageError::UnknownCommand("--login".into())));
    assert!(
        err.help()
            .unwrap()
            .to_string()
            .ends_with("Error: Command not found: --login")
    );
}

#[test]
fn test_positional_defaults() {
    let schema = ValuesSchema::new(
        Schema::new()
            .with_field(FieldSchema::string("name").required())
            .with_field(FieldSchema::string("greeting").with_default("Hello")),
    )
    .unwrap();

    let parsed = Context::new("greet", ["Ann"]).values(&schema).unwrap();
    assert_eq!(parsed.data, data(json!({"name": "Ann", "greeting": "Hello"})));
}

#[test]
fn test_deny_reports_first_leftover() {
    let schema =
        OptionsSchema::new(Schema::new().with_field(FieldSchema::boolean("verbose"))).unwrap();
    assert_eq!(schema.variadic(), VariadicPolicy::Deny);

    let err = Context::new("app", ["extra1", "--verbose", "extra2"])
        .options(&schema)
        .unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert_eq!(
        err.usage_error(),
        Some(&UsageError::UnexpectedArgument("extra1".into()))
    );
}

// ----------------------------------------------------------------------------
// Dispatch and help composition
// ----------------------------------------------------------------------------

#[test]
fn test_camel_case_command_reachable_in_kebab_case() {
    let commands = Commands::new()
        .with(Command::new("sendMessage", |ctx: Context| {
            Ok(ctx.command_path().to_vec())
        }))
        .with(Command::new("login", |ctx: Context| Ok(ctx.command_path().to_vec())));

    let path = Context::new("chat", ["send-message"]).command(&commands).unwrap();
    assert_eq!(path, ["send-message"]);

    let err = Context::new("chat", ["--help"]).command(&commands).unwrap_err();
    assert_eq!(
        err.help().unwrap().body_lines(),
        vec!["Usage: chat <command>", "", "Commands:", "  login", "  send-message"]
    );
}

#[test]
fn test_nested_options_help() {
    let schema = OptionsSchema::new(
        Schema::new()
            .with_field(
                FieldSchema::string("channel")
                    .with_short('c')
                    .required()
                    .with_description("Channel to post to"),
            )
            .with_field(FieldSchema::array("mention", ScalarKind::String))
            .with_field(
                FieldSchema::enumeration("priority", ["low", "high"]).with_default("low"),
            ),
    )
    .unwrap();
    let messages = Commands::new().with(
        Command::new("send", |ctx: Context| ctx.options(&schema)).with_description("Send one"),
    );
    let root = Commands::new().with(
        Command::new("message", |ctx: Context| ctx.command(&messages))
            .with_description("Message commands"),
    );

    let err = Context::new("chat", ["message", "send", "--help"])
        .command(&root)
        .unwrap_err();
    assert_eq!(
        err.help().unwrap().to_string(),
        [
            "Usage: chat message send <options>",
            "",
            "Options:",
            "  --channel, -c <string>  Channel to post to",
            "                          (required)",
            "  --mention <string>...",
            "  --priority <choice>     one of: low, high",
            "                          (default: low)",
        ]
        .join("\n")
    );
}

#[test]
fn test_non_options_and_accumulation() {
    let schema = OptionsSchema::new(
        Schema::new()
            .with_field(FieldSchema::array("tag", ScalarKind::String).with_short('t'))
            .with_field(FieldSchema::boolean("dry-run")),
    )
    .unwrap()
    .with_variadic(VariadicPolicy::Allow);

    let parsed = Context::new(
        "app",
        ["-t", "a", "file", "--dry-run", "--tag", "b", "--", "--tag", "c", "-x"],
    )
    .options(&schema)
    .unwrap();

    assert_eq!(parsed.get("tag"), Some(&json!(["a", "b"])));
    assert_eq!(parsed.get("dry-run"), Some(&json!(true)));
    assert_eq!(parsed.rest, ["file"]);
    assert_eq!(parsed.non_options.as_deref(), Some("--tag c -x"));
    assert_eq!(parsed.trailing, ["--tag", "c", "-x"]);
}

#[test]
fn test_deserialize_into_struct() {
    #[derive(Debug, Deserialize)]
    struct Login {
        username: String,
        password: String,
    }

    let parsed = Context::new("app", ["--username", "alice", "--password", "secret1"])
        .options(&login_schema())
        .unwrap();
    let login: Login = parsed.deserialize().unwrap();
    assert_eq!(login.username, "alice");
    assert_eq!(login.password, "secret1");
}

#[test]
fn test_custom_strings_and_placeholder() {
    let config = ParserConfig::from_yaml_str(
        r#"
placeholder: "[]"
strings:
  commands_title: "Available commands:"
  command_not_found: "No such command: <command>"
  error: "!! <message>"
"#,
    )
    .unwrap();

    let err = Context::new("chat", ["nope"])
        .with_config(&config)
        .command(&chat_commands())
        .unwrap_err();
    assert_eq!(
        err.help().unwrap().to_string(),
        [
            "Usage: chat [command]",
            "",
            "Available commands:",
            "  login",
            "  message",
            "",
            "!! No such command: nope",
        ]
        .join("\n")
    );
}

#[test]
fn test_construction_errors_are_not_usage_errors() {
    let duplicate = OptionsSchema::new(
        Schema::new()
            .with_field(FieldSchema::string("user").with_short('u'))
            .with_field(FieldSchema::string("url").with_short('u')),
    );
    let err = CliError::from(duplicate.unwrap_err());
    assert!(matches!(err, CliError::Schema(SchemaError::DuplicateShortAlias { .. })));
    assert!(err.help().is_none());
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_usage_error_report_goes_to_stderr() {
    let err = Context::new("chat", ["send"])
        .command(&chat_commands())
        .unwrap_err();

    let mut out = Printer::buffer();
    let mut stderr = Printer::buffer();
    err.report_to(&mut out, &mut stderr).unwrap();

    assert!(out.into_string().is_empty());
    assert!(stderr.into_string().ends_with("\n\nError: Command not found: send\n"));
}

#[test]
fn test_nested_handler_failure_logged_once() {
    let sync = Commands::new().with(Command::new("push", |_: Context| -> Result<()> {
        Err(CliError::handler("remote hung up"))
    }));
    let remote = Commands::new().with(Command::new("remote", |ctx: Context| ctx.command(&sync)));
    let root = Commands::new().with(Command::new("git", |ctx: Context| ctx.command(&remote)));

    let logs = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let err = Context::new("app", ["git", "remote", "push"])
            .command(&root)
            .unwrap_err();
        assert!(matches!(err, CliError::Handler(_)));

        let mut out = Printer::buffer();
        let mut stderr = Printer::buffer();
        err.report_to(&mut out, &mut stderr).unwrap();
        assert!(stderr.into_string().contains("remote hung up"));
    });

    assert_eq!(logs.text().matches("command handler failed").count(), 1);
}
