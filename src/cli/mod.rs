//! Command-line interface for pr-review
//!
//! Provides `describe`, `review`, `config`, and `completions` subcommands.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod describe;
mod review;
mod utils;

/// Describe and review GitHub pull requests with an LLM
#[derive(Parser)]
#[command(name = "pr-review")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ./pr-review.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a concise description for a pull request
    Describe(describe::DescribeArgs),

    /// Review a pull request for code quality issues
    Review(Box<review::ReviewArgs>),

    /// Print the effective configuration with secrets masked
    Config,

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Describe(args) => describe::run(args, cli.config.as_deref()),
        Commands::Review(args) => review::run(*args, cli.config.as_deref()),
        Commands::Config => utils::print_config(cli.config.as_deref()),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "pr-review", &mut std::io::stdout());
            Ok(())
        }
    }
}
