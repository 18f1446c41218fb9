mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::commit;
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::error::AppResult;
use crate::infra::terminal::TerminalInteraction;
use crate::workflow::commit::CommitAction;

#[derive(Parser)]
#[command(
    name = "autocommit",
    author,
    version,
    about = "Commit changes with Gemini-written conventional commit messages"
)]
struct Cli {
    /// Run as if started in this directory.
    #[arg(short = 'C', long = "repo", global = true)]
    repo: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose changed files and commit them with one generated message.
    Select,
    /// Commit every changed file separately, each with its own message.
    All,
    /// Commit the staged changes with a generated message.
    Staged(StagedArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct StagedArgs {
    /// Accept the generated message without the edit prompt.
    #[arg(short, long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Returns whether the action finished without failing.
async fn run(cli: Cli) -> AppResult<bool> {
    let action = match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            return Ok(true);
        }
        Commands::Select => CommitAction::SelectAndCommit,
        Commands::All => CommitAction::CommitAll,
        Commands::Staged(args) => CommitAction::CommitStaged { confirm: !args.yes },
    };

    let start = match cli.repo {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let outcome = commit::run(&start, Arc::new(TerminalInteraction::new()), action).await;
    Ok(!outcome.is_failure())
}
