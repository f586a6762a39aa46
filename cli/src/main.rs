use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_args::{CliError, Context, ParserConfig, Printer, load_definition, run_definition};
use command_args_core::{CommandDef, VariadicPolicy, validate_definition};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "command-args")]
#[command(about = "Check command definitions and parse arguments against them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a command definition file.
    Check(CheckArgs),
    /// Parse arguments against a command definition and print the result as JSON.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
    /// Parser configuration file with placeholder and message overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Program name shown in usage lines (default: the definition's name).
    #[arg(long)]
    program: Option<String>,
    /// Override the leftover-argument policy of every level.
    #[arg(long, value_enum)]
    variadic: Option<VariadicPolicy>,
    /// Style error lines even when stderr is not a terminal.
    #[arg(long)]
    color: bool,
    /// Arguments to parse, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Command::Check(args) => finish(run_check(args)),
        Command::Parse(args) => match run_parse(args) {
            Ok(code) => code,
            Err(err) => finish(Err(err)),
        },
    };
    std::process::exit(code);
}

fn finish(result: Result<(), String>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let def = read_definition(&args.definition)?;
    let errors = validate_definition(&def);
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|e| format!("  {e}")).collect();
        return Err(format!(
            "'{}' is invalid:\n{}",
            args.definition.display(),
            lines.join("\n")
        ));
    }

    println!(
        "Definition '{}' is valid ({} command(s)).",
        def.name,
        count_commands(&def)
    );
    Ok(())
}

/// Returns the process exit status of the parse.
fn run_parse(args: ParseArgs) -> Result<i32, String> {
    let mut def = read_definition(&args.definition)?;
    let config = match &args.config {
        Some(path) => ParserConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ParserConfig::default(),
    };
    if let Some(policy) = args.variadic {
        override_variadic(&mut def, policy);
    }

    let program = args.program.unwrap_or_else(|| def.name.clone());
    debug!(%program, count = args.args.len(), "parsing");
    let ctx = Context::new(program, args.args).with_config(&config);

    match run_definition(ctx, &def) {
        Ok(invocation) => {
            let raw = serde_json::to_string_pretty(&invocation)
                .map_err(|err| format!("Failed to serialize result: {err}"))?;
            println!("{raw}");
            Ok(0)
        }
        Err(err) => {
            report(&err, args.color || config.color);
            Ok(err.exit_code())
        }
    }
}

fn report(err: &CliError, force_color: bool) {
    let mut out = Printer::stdout();
    let mut stderr = Printer::stderr();
    if force_color {
        colored::control::set_override(true);
        out = out.with_style(true);
        stderr = stderr.with_style(true);
    }
    if let Err(io) = err.report_to(&mut out, &mut stderr) {
        debug!(error = %io, "failed to write report");
    }
}

fn read_definition(path: &Path) -> Result<CommandDef, String> {
    load_definition(path)
        .map_err(|err| format!("Failed to load definition '{}': {err}", path.display()))
}

fn override_variadic(def: &mut CommandDef, policy: VariadicPolicy) {
    if let Some(options) = def.options.as_mut() {
        options.variadic = policy;
    }
    if let Some(values) = def.values.as_mut() {
        values.variadic = policy;
    }
    for sub in &mut def.commands {
        override_variadic(sub, policy);
    }
}

fn count_commands(def: &CommandDef) -> usize {
    def.commands
        .iter()
        .map(|sub| 1 + count_commands(sub))
        .sum()
}
