mod schema_file;

use anyhow::{Context, Result};
use argmodel::{ParseError, Tokens};
use clap::{Args, Parser, Subcommand};
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing_subscriber::{EnvFilter, fmt};

use crate::schema_file::{load_schema, write_default_schema};

/// Exit status for tokens the schema rejects.
const EXIT_PARSE_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "argmodel")]
#[command(version, about = "Parse command line tokens against a JSON schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter argmodel.json
    Init(InitArgs),

    /// Parse tokens and print the resulting model as JSON
    Parse(ParseArgs),

    /// Print the usage text described by a schema
    Usage(SchemaArgs),

    /// Validate a schema document
    Check(SchemaArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing argmodel.json
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct SchemaArgs {
    /// Schema file (default: ./argmodel.json)
    #[arg(short, long, value_name = "FILE", env = "ARGMODEL_SCHEMA")]
    schema: Option<PathBuf>,
}

#[derive(Parser)]
struct ParseArgs {
    #[command(flatten)]
    schema: SchemaArgs,

    /// Stop quietly at the first unknown token instead of failing
    #[arg(long)]
    ignore_unknown: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Tokens to parse; put them after `--`
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
        Commands::Usage(args) => usage(args),
        Commands::Check(args) => check(args),
    }
}

fn init(args: InitArgs) -> Result<ExitCode> {
    tracing::debug!("executing init command");
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;
    let path = write_default_schema(&dir, args.force)?;
    eprintln!("Created {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn parse(args: ParseArgs) -> Result<ExitCode> {
    tracing::debug!(tokens = args.tokens.len(), "executing parse command");
    let schema = load_schema(args.schema.schema.as_deref())?;
    let mut parser = schema.parser()?;
    if args.ignore_unknown {
        parser.set_ignore_unknown(true);
    }

    let mut stdout = io::stdout().lock();
    if parser
        .print_usage_if_help_requested(&mut stdout, &args.tokens)
        .context("failed to write usage")?
    {
        return Ok(ExitCode::SUCCESS);
    }

    // An empty token list is a valid input here; schemas without mandatory
    // items accept it.
    let mut tokens = Tokens::new(&args.tokens);
    let model = match parser.parse_tokens(&mut tokens) {
        Ok(model) => model,
        Err(err) => return Ok(report_parse_error(&err, &parser.syntax())),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&model)
    } else {
        serde_json::to_string(&model)
    }
    .context("failed to serialize argument model")?;
    writeln!(stdout, "{json}").context("failed to write output")?;
    Ok(ExitCode::SUCCESS)
}

fn report_parse_error(err: &ParseError, syntax: &str) -> ExitCode {
    tracing::debug!(error = ?err, "tokens rejected");
    eprintln!("error: {err}");
    if !syntax.is_empty() {
        eprintln!("usage: {syntax}");
    }
    ExitCode::from(EXIT_PARSE_ERROR)
}

fn usage(args: SchemaArgs) -> Result<ExitCode> {
    tracing::debug!("executing usage command");
    let schema = load_schema(args.schema.as_deref())?;
    let parser = schema.parser()?;
    let mut stdout = io::stdout().lock();
    parser
        .write_usage(&mut stdout)
        .context("failed to write usage")?;
    Ok(ExitCode::SUCCESS)
}

fn check(args: SchemaArgs) -> Result<ExitCode> {
    tracing::debug!("executing check command");
    let schema = load_schema(args.schema.as_deref())?;
    let parser = schema.parser()?;
    let items = parser.arguments();
    let commands = items.iter().filter(|item| item.is_command()).count();
    eprintln!("OK: {}", schema.path.display());
    eprintln!(
        "{} item(s), {} command(s), syntax: {}",
        items.len(),
        commands,
        parser.syntax()
    );
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
