mod commands;
mod config;
mod store;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, check, init, render, responses, ApplyArgs, CheckArgs, InitArgs, RenderArgs,
    ResponsesArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Labelforge CLI - build and check labelling templates
#[derive(Parser, Debug)]
#[command(name = "labelforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Labelforge project
    Init(InitArgs),

    /// Check template documents for problems
    Check(CheckArgs),

    /// Render a template to HTML
    Render(RenderArgs),

    /// Export the answers of a filled-in template as JSON
    Responses(ResponsesArgs),

    /// Apply a list of editor commands to a stored template
    Apply(ApplyArgs),
}

fn init_logging(verbose: bool, config: &Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Cannot get current directory")?;
    let config = Config::load(&cwd).context("Failed to load labelforge.config.json")?;
    init_logging(cli.verbose, &config);

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Check(args) => check(args, &cwd, &config),
        Command::Render(args) => render(args, &cwd, &config),
        Command::Responses(args) => responses(args, &cwd),
        Command::Apply(args) => apply(args, &cwd, &config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
