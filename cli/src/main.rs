use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_dispatch_core::{
    ArgumentBag, CommandNode, CommandParser, OptionSpec, OptionType, ParseResult,
    SuggestionEngine, SuggestionScope, validate_tree,
};
use command_dispatch_shell::{
    DispatchMode, FAILURE_MESSAGE_KEY, InvokeError, Invocation, ResponseFormat, Shell,
    ShellConfig, build_failure_message, load_tree,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmd-dispatch")]
#[command(about = "Parse, explore and validate hierarchical command trees")]
struct Cli {
    /// Log parser and shell activity to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one command line against a tree and print the result.
    Parse(ParseArgs),
    /// Start an interactive shell over a tree, reading stdin.
    Shell(ShellArgs),
    /// Suggest the nearest command paths for a query.
    Suggest(SuggestArgs),
    /// Check a tree file for structural errors.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct TreeArgs {
    /// Command tree file (.json, .yaml or .yml).
    #[arg(long)]
    tree: PathBuf,
    /// Shell configuration YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leading word consumed as the program name; repeatable. Overrides the
    /// configuration's primary commands.
    #[arg(long = "primary")]
    primary_commands: Vec<String>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// Command line to tokenize; conflicts with trailing tokens.
    #[arg(long, conflicts_with = "tokens")]
    line: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Pre-split tokens (pass after `--`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct ShellArgs {
    #[command(flatten)]
    tree: TreeArgs,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    /// Command tree file (.json, .yaml or .yml).
    #[arg(long)]
    tree: PathBuf,
    /// Only suggest leaf commands, never groups.
    #[arg(long)]
    commands_only: bool,
    /// Text to match against full command paths.
    query: String,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Command tree file (.json, .yaml or .yml).
    #[arg(long)]
    tree: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Shell(args) => run_shell(args),
        Command::Suggest(args) => run_suggest(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(default_level)
    });

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .try_init();

    if let Err(err) = result {
        eprintln!("Log system initialization failed: {err}");
        std::process::exit(1);
    }
}

fn load_tree_args(args: &TreeArgs) -> Result<(CommandNode, ShellConfig), String> {
    let tree = load_tree(&args.tree)
        .map_err(|err| format!("Failed to load tree '{}': {err}", args.tree.display()))?;

    let mut config = match &args.config {
        Some(path) => ShellConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ShellConfig::default(),
    };
    if !args.primary_commands.is_empty() {
        config.primary_commands = args.primary_commands.clone();
    }
    debug!(tree = %args.tree.display(), config = ?config, "Loaded tree and config");
    Ok((tree, config))
}

// ---------------------------------------------------------------------------
// parse command
// ---------------------------------------------------------------------------

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let (tree, config) = load_tree_args(&args.tree)?;
    let parser =
        CommandParser::new(&tree).with_primary_commands(config.primary_commands.iter().cloned());

    let (result, issued) = match &args.line {
        Some(line) => (parser.parse(line.as_str()), line.clone()),
        None => (parser.parse(&args.tokens), args.tokens.join(" ")),
    };

    print!("{}", format_parse_result(&result, args.format)?);

    if result.success {
        return Ok(());
    }
    let engine = SuggestionEngine::new(&tree);
    Err(build_failure_message(
        &tree,
        &engine,
        &config.primary_commands,
        config.bin_name_for(&tree),
        &issued,
    ))
}

fn format_parse_result(result: &ParseResult<'_>, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(result)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("Failed to serialize output: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(result).map_err(|e| format!("Failed to serialize output: {e}"))
        }
    }
}

// ---------------------------------------------------------------------------
// shell command
// ---------------------------------------------------------------------------

fn run_shell(args: ShellArgs) -> Result<(), String> {
    let (tree, config) = load_tree_args(&args.tree)?;
    let bin_name = config.bin_name_for(&tree).to_string();

    let mut shell = Shell::new(
        &tree,
        BufReader::new(io::stdin()),
        io::stdout(),
        |inv: &Invocation<'_>| -> Result<(), InvokeError> {
            println!("{}", render_invocation(inv, &bin_name)?);
            Ok(())
        },
        |inv: &Invocation<'_>| -> Result<(), InvokeError> {
            if let Some(message) = inv
                .arguments
                .get(FAILURE_MESSAGE_KEY)
                .and_then(|value| value.as_str())
            {
                eprintln!("{message}");
            }
            Ok(())
        },
    )
    .with_config(config);

    shell.start().map_err(|err| format!("Shell stopped: {err}"))
}

/// Output printed for a dispatched line: help for the node, or the command
/// path with its arguments.
fn render_invocation(inv: &Invocation<'_>, bin_name: &str) -> Result<String, InvokeError> {
    let path = inv.arguments.commands().join(" ");
    let output = match inv.mode() {
        DispatchMode::Help(ResponseFormat::Json) => serde_json::to_string_pretty(inv.node)?,
        DispatchMode::Help(ResponseFormat::Default) => render_help(inv.node, bin_name, &path),
        DispatchMode::Run(ResponseFormat::Json) => {
            #[derive(serde::Serialize)]
            struct RunOutput<'a> {
                command: &'a str,
                arguments: &'a ArgumentBag,
            }

            serde_json::to_string_pretty(&RunOutput {
                command: &path,
                arguments: inv.arguments,
            })?
        }
        DispatchMode::Run(ResponseFormat::Default) => {
            format!("{bin_name} {path}: {}", serde_json::to_string(inv.arguments)?)
        }
    };
    Ok(output)
}

fn render_help(node: &CommandNode, bin_name: &str, path: &str) -> String {
    let usage = [bin_name, path]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = Vec::new();
    if node.has_children() {
        lines.push(format!("Usage: {usage} <command> [options]"));
    } else {
        let positionals: String = node
            .positionals
            .iter()
            .map(|p| format!(" <{}>", p.name))
            .collect();
        lines.push(format!("Usage: {usage}{positionals} [options]"));
    }
    if let Some(description) = &node.description {
        lines.push(String::new());
        lines.push(description.clone());
    }

    if node.has_children() {
        lines.push(String::new());
        lines.push("Commands:".to_string());
        for child in &node.children {
            lines.push(describe(&child.name, &child.aliases, child.description.as_deref()));
        }
    }

    lines.push(String::new());
    lines.push("Options:".to_string());
    let builtins = [OptionSpec::help(), OptionSpec::response_format_json()];
    for option in node.options.iter().chain(builtins) {
        let name = format!("--{} ({})", option.name, type_name(option.option_type));
        lines.push(describe(&name, &option.aliases, option.description.as_deref()));
    }

    lines.join("\n")
}

fn describe(name: &str, aliases: &[String], description: Option<&str>) -> String {
    let mut label = name.to_string();
    if !aliases.is_empty() {
        label.push_str(&format!(" [{}]", aliases.join(", ")));
    }
    match description {
        Some(description) => format!("  {label:<26} {description}"),
        None => format!("  {label}"),
    }
}

fn type_name(option_type: OptionType) -> &'static str {
    match option_type {
        OptionType::Boolean => "boolean",
        OptionType::String => "string",
        OptionType::Number => "number",
        OptionType::Array => "array",
    }
}

// ---------------------------------------------------------------------------
// suggest command
// ---------------------------------------------------------------------------

fn run_suggest(args: SuggestArgs) -> Result<(), String> {
    let tree = load_tree(&args.tree)
        .map_err(|err| format!("Failed to load tree '{}': {err}", args.tree.display()))?;
    let engine = SuggestionEngine::new(&tree);
    let scope = if args.commands_only {
        SuggestionScope::Commands
    } else {
        SuggestionScope::Anything
    };

    let (nearest, second) = engine.closest_two(&args.query, scope);
    let Some(nearest) = nearest else {
        return Err(format!("No suggestions for '{}': tree has no entries", args.query));
    };
    for suggestion in std::iter::once(nearest).chain(second) {
        println!("{}\t{}", suggestion.full_path, suggestion.distance);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate command
// ---------------------------------------------------------------------------

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let tree = load_tree(&args.tree)
        .map_err(|err| format!("Failed to load tree '{}': {err}", args.tree.display()))?;

    let errors = validate_tree(&tree);
    if errors.is_empty() {
        let engine = SuggestionEngine::new(&tree);
        println!(
            "Validated command tree '{}' with {} path(s).",
            tree.name,
            engine.entries().len()
        );
        return Ok(());
    }

    for error in &errors {
        eprintln!("  {error}");
    }
    Err(format!("{} validation error(s) in '{}'", errors.len(), args.tree.display()))
}
