mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{body, check_update, init, library, BodyCommand, InitArgs, LibraryCommand, UpdateArgs};
use config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Sheetedit - settings editors and update checks for character sheets
#[derive(Parser, Debug)]
#[command(name = "sheetedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter config and body type
    Init(InitArgs),

    /// Inspect and edit body type files
    Body {
        #[command(subcommand)]
        command: BodyCommand,
    },

    /// Manage data libraries
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },

    /// Application updates
    Update {
        #[command(subcommand)]
        command: UpdateCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UpdateCommand {
    /// Look for a newer release
    Check(UpdateArgs),
}

async fn run(command: Command, cwd: &Path) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, cwd),
        Command::Body { command } => body(command, &Config::load(cwd)?),
        Command::Library { command } => {
            let mut config = Config::load(cwd)?;
            library(command, cwd, &mut config).await
        }
        Command::Update {
            command: UpdateCommand::Check(args),
        } => {
            let mut config = Config::load(cwd)?;
            check_update(args, cwd, &mut config).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => run(cli.command, &cwd).await,
        Err(err) => Err(anyhow::Error::new(err).context("Cannot get current directory")),
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "command failed");
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
