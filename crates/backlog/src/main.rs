mod command;
mod config;
mod output;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use backlog_core::{process_response, BacklogPipeline, BacklogTable, DateLocalizer};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::command::CommandGenerator;
use crate::config::CliConfig;
use crate::output::OutputFormat;

const QUOTA_MESSAGE: &str = "The text generation quota is exhausted. Try again later, \
                             use a shorter backlog, or enable billing for the model account.";

#[derive(Parser, Debug)]
#[command(author, version, about = "Group raw backlog items into epics", long_about = None)]
struct Cli {
    /// Configuration file (defaults to $BACKLOG_CONFIG, then ./backlog.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send raw backlog text to the generator and print the grouped table
    Convert(ConvertArgs),
    /// Run a saved model reply through the parser without calling the generator
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Raw backlog file; `-` or omitted reads stdin
    #[arg(long, short)]
    input: Option<PathBuf>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// File holding a previously captured model reply
    #[arg(long, short)]
    response: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the result here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert(args) => handle_convert(cli.config.as_deref(), args),
        Command::Replay(args) => handle_replay(args),
    }
}

fn handle_convert(config_path: Option<&Path>, args: ConvertArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    if raw.trim().is_empty() {
        bail!("the backlog is empty; paste some backlog items first");
    }

    let config = CliConfig::load(config_path)?;
    let generator = CommandGenerator::from_config(&config.generator)?;
    let pipeline = BacklogPipeline::new(generator);

    let table = table_or_user_error(pipeline.run(&raw))?;
    write_table(&table, &args.output)
}

/// Turns a pipeline outcome into the message a user sees. Quota exhaustion
/// gets remediation advice; every other "no result" points at the logs.
fn table_or_user_error(
    outcome: backlog_core::Result<Option<BacklogTable>>,
) -> Result<BacklogTable> {
    match outcome {
        Ok(Some(table)) => Ok(table),
        Ok(None) => {
            bail!("could not process the backlog; the model reply could not be parsed, see logs")
        }
        Err(err) if err.is_quota_exceeded() => {
            warn!(error = %err, "generator quota exhausted");
            bail!(QUOTA_MESSAGE)
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_replay(args: ReplayArgs) -> Result<()> {
    let reply = fs::read_to_string(&args.response)
        .with_context(|| format!("failed to read model reply {}", args.response.display()))?;

    let table = process_response(&reply, &DateLocalizer::default()).with_context(|| {
        format!("model reply {} could not be processed", args.response.display())
    })?;

    write_table(&table, &args.output)
}

fn write_table(table: &BacklogTable, args: &OutputArgs) -> Result<()> {
    let rendered = output::render(table, args.format)?;
    output::emit(&rendered, args.output.as_deref())?;
    let destination = args
        .output
        .as_deref()
        .map_or_else(|| "stdout".to_string(), |path| path.display().to_string());
    info!(rows = table.len(), format = ?args.format, %destination, "backlog table written");
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read backlog file {}", path.display())),
        _ => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read backlog from stdin")?;
            Ok(raw)
        }
    }
}
