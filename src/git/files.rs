//! Changed-file lookup for a single commit.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::error::ScopeError;

/// Lists the files a commit touched.
pub trait FileLister: Send + Sync {
    /// Returns the repository-relative paths changed by `hash`.
    fn changed_files<'a>(
        &'a self,
        hash: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>>;
}

/// File lister backed by `git diff-tree`.
#[derive(Debug, Clone)]
pub struct GitDiffTreeLister {
    repo_root: PathBuf,
}

impl GitDiffTreeLister {
    /// Creates a lister that runs git inside `repo_root`.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    async fn diff_tree(&self, hash: &str) -> Result<Vec<String>> {
        let output = Command::new("git")
            .args(["diff-tree", "--root", "--no-commit-id", "--name-only", "-r", hash])
            .current_dir(&self.repo_root)
            .output()
            .await
            .context("Failed to execute git diff-tree")?;

        if !output.status.success() {
            return Err(ScopeError::FileLookup {
                hash: hash.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let files = parse_name_only(&String::from_utf8_lossy(&output.stdout));
        debug!(commit = %hash, files = files.len(), "Listed changed files");
        Ok(files)
    }
}

impl FileLister for GitDiffTreeLister {
    fn changed_files<'a>(
        &'a self,
        hash: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>> {
        Box::pin(self.diff_tree(hash))
    }
}

/// Parses `--name-only` output, one path per line.
fn parse_name_only(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_only_skips_blank_lines() {
        let stdout = "packages/foo/index.js\n\nshared/lib/util.js\r\n";
        assert_eq!(
            parse_name_only(stdout),
            vec!["packages/foo/index.js", "shared/lib/util.js"]
        );
    }

    #[test]
    fn parse_name_only_empty_output() {
        assert!(parse_name_only("").is_empty());
    }

    #[tokio::test]
    async fn unknown_commit_is_a_lookup_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();

        let lister = GitDiffTreeLister::new(temp_dir.path());
        let err = lister
            .changed_files("0123456789abcdef0123456789abcdef01234567")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScopeError>(),
            Some(ScopeError::FileLookup { .. })
        ));
    }
}
