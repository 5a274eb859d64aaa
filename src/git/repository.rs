//! Git repository operations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::Repository;

use crate::git::Commit;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository containing the current directory
    pub fn open() -> Result<Self> {
        Self::discover(".")
    }

    /// Open the repository containing `path`, searching parent directories
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Get the top-level work tree directory
    pub fn root(&self) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .context("Repository has no work tree (bare repository)")?;

        // git2 reports the work tree with a trailing separator and without
        // resolving symlinks; canonicalize so it compares with manifest paths.
        workdir
            .canonicalize()
            .with_context(|| format!("Failed to resolve work tree {}", workdir.display()))
    }

    /// Parse commit range and get commits, oldest first
    pub fn get_commits_in_range(&self, range: &str) -> Result<Vec<Commit>> {
        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker
            .set_sorting(git2::Sort::TOPOLOGICAL)
            .context("Failed to set revwalk sorting")?;

        if range.contains("..") {
            walker
                .push_range(range)
                .with_context(|| format!("Invalid range format: {range}"))?;
        } else {
            let obj = self
                .repo
                .revparse_single(range)
                .with_context(|| format!("Failed to parse commit: {range}"))?;
            let commit = obj
                .peel_to_commit()
                .context("Failed to peel object to commit")?;
            walker
                .push(commit.id())
                .context("Failed to push start commit")?;
        }

        let mut commits = Vec::new();
        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = self
                .repo
                .find_commit(oid)
                .context("Failed to find commit")?;

            commits.push(Commit::from_git_commit(&commit)?);
        }

        // Reverse to get chronological order (oldest first)
        commits.reverse();

        Ok(commits)
    }
}
