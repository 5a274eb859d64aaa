//! Commits command: lists the commits that belong to the current package.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{ConcurrencyLimit, ScopeConfig};
use crate::git::{EnrichedCommit, GitDiffTreeLister, GitRepository};
use crate::scope::{PackageScope, RepoPath};

/// Commits command options.
#[derive(Parser)]
pub struct CommitsCommand {
    /// Commit range to scan (e.g., v1.2.0..HEAD, abc123..def456).
    #[arg(value_name = "COMMIT_RANGE")]
    pub commit_range: Option<String>,

    /// Additional directory, relative to the repository root, whose changes
    /// count towards the package. Repeatable.
    #[arg(long = "dependency", short = 'd', value_name = "PATH")]
    pub dependencies: Vec<RepoPath>,

    /// Maximum number of concurrent changed-file lookups.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Configuration file (defaults to .scoped-commits.yaml at the repository root).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory inside the package (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub package_dir: Option<PathBuf>,

    /// Outputs the commits with their changed files as YAML.
    #[arg(long)]
    pub yaml: bool,
}

impl CommitsCommand {
    /// Executes the commits command.
    pub async fn execute(self) -> Result<()> {
        let start_dir = match &self.package_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let commit_range = self.commit_range.as_deref().unwrap_or("HEAD");

        let (repo_root, commits) = {
            let repo = GitRepository::discover(&start_dir).context(
                "Failed to open git repository. Make sure you're in a git repository.",
            )?;
            (repo.root()?, repo.get_commits_in_range(commit_range)?)
        };

        let config = self.resolve_config(&repo_root)?;
        let scope = PackageScope::discover_from(
            &start_dir,
            &repo_root,
            &config,
            GitDiffTreeLister::new(&repo_root),
        )?;

        let yaml = self.yaml;
        scope
            .with_only_package_commits(commits, |filtered| async move {
                print_commits(&filtered, yaml)
            })
            .await
    }

    /// Layers command-line flags over the file and environment configuration.
    fn resolve_config(&self, repo_root: &std::path::Path) -> Result<ScopeConfig> {
        let config = match &self.config {
            Some(path) => ScopeConfig::load_from_path(path)?.with_env_override()?,
            None => ScopeConfig::load(repo_root)?,
        };

        let config = config.with_dependencies(self.dependencies.iter().cloned());
        match self.concurrency {
            Some(limit) => Ok(config.with_concurrency(ConcurrencyLimit::new(limit)?)),
            None => Ok(config),
        }
    }
}

fn print_commits(commits: &[EnrichedCommit], yaml: bool) -> Result<()> {
    if yaml {
        let output = serde_yaml::to_string(commits).context("Failed to serialize commits")?;
        print!("{output}");
        return Ok(());
    }

    for enriched in commits {
        println!("{} {}", enriched.commit.short_hash(), enriched.commit.subject);
    }
    Ok(())
}
