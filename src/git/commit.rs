//! Commit records handed through the scoping pipeline.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use git2::Commit as GitCommit;
use serde::{Deserialize, Serialize};

/// A commit as produced by the host tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full SHA-1 hash of the commit
    pub hash: String,
    /// First line of the commit message
    pub subject: String,
    /// The full commit message as written by the author
    pub message: String,
    /// Commit author name and email address
    pub author: String,
    /// Commit date in ISO format with timezone
    pub date: DateTime<FixedOffset>,
}

impl Commit {
    /// Creates a commit record from a hash and subject, leaving the remaining
    /// metadata empty.
    pub fn new(hash: impl Into<String>, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        Self {
            hash: hash.into(),
            message: subject.clone(),
            subject,
            author: String::new(),
            date: DateTime::<Utc>::default().fixed_offset(),
        }
    }

    /// Create a commit record from git2::Commit
    pub fn from_git_commit(commit: &GitCommit) -> Result<Self> {
        let hash = commit.id().to_string();

        let author = format!(
            "{} <{}>",
            commit.author().name().unwrap_or("Unknown"),
            commit.author().email().unwrap_or("unknown@example.com")
        );

        let timestamp = commit.author().when();
        let offset = FixedOffset::east_opt(timestamp.offset_minutes() * 60)
            .context("Invalid commit timezone offset")?;
        let date = DateTime::from_timestamp(timestamp.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(&offset);

        let message = commit.message().unwrap_or("").to_string();
        let subject = message.lines().next().unwrap_or("").trim().to_string();

        Ok(Self {
            hash,
            subject,
            message,
            author,
            date,
        })
    }

    /// Returns the abbreviated hash used in human-readable output.
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(crate::git::SHORT_HASH_LEN) {
            Some((end, _)) => &self.hash[..end],
            None => &self.hash,
        }
    }
}

/// A commit together with the files it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedCommit {
    /// The commit as received from upstream
    #[serde(flatten)]
    pub commit: Commit,
    /// Paths relative to the repository root, in the order git reported them
    pub files: Arc<[String]>,
}

impl EnrichedCommit {
    /// Attaches a file list to a commit.
    pub fn new(commit: Commit, files: Arc<[String]>) -> Self {
        Self { commit, files }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_truncates_hex_hashes() {
        let commit = Commit::new("0123456789abcdef", "subject");
        assert_eq!(commit.short_hash(), "01234567");
        assert_eq!(Commit::new("abc", "subject").short_hash(), "abc");
    }

    #[test]
    fn short_hash_stops_on_char_boundaries() {
        assert_eq!(Commit::new("aéééé", "subject").short_hash(), "aéééé");
        assert_eq!(Commit::new("ééééééééé", "subject").short_hash(), "éééééééé");
    }
}
