//! CLI interface for scoped-commits.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commits;

pub use commits::CommitsCommand;

/// scoped-commits: lists the commits that belong to one package of a monorepo.
#[derive(Parser)]
#[command(name = "scoped-commits")]
#[command(about = "Lists the commits that belong to one package of a monorepo", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Lists commits touching the package in the current directory.
    Commits(CommitsCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Commits(commits_cmd) => commits_cmd.execute().await,
        }
    }
}
