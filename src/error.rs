//! Domain errors for package scoping.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scoping commits to a package.
#[derive(Error, Debug)]
pub enum ScopeError {
    /// The changed-file lookup failed for a commit.
    #[error("Failed to list files changed by commit {hash}: {message}")]
    FileLookup {
        /// Commit hash that was being looked up.
        hash: String,
        /// Backend error output.
        message: String,
    },

    /// No package manifest exists at or above the start directory.
    #[error("No {file_name} found in {} or any parent directory", start.display())]
    ManifestNotFound {
        /// Directory the upward search started from.
        start: PathBuf,
        /// Manifest file name that was searched for.
        file_name: String,
    },

    /// The manifest exists but could not be read or parsed.
    #[error("Failed to read package manifest {}: {message}", path.display())]
    ManifestRead {
        /// Manifest location.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },

    /// The manifest has no usable `name` field.
    #[error("Package manifest {} does not declare a name", path.display())]
    ManifestName {
        /// Manifest location.
        path: PathBuf,
    },

    /// The manifest lies outside the repository work tree.
    #[error("{} is not inside the repository work tree", path.display())]
    NotInWorkTree {
        /// Offending path.
        path: PathBuf,
    },

    /// A package or dependency root could not be normalized.
    #[error("Invalid repository path '{path}': {reason}")]
    InvalidPath {
        /// Path as supplied.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A concurrency limit override was zero or not a number.
    #[error("Invalid concurrency limit '{value}': expected a positive integer")]
    InvalidConcurrency {
        /// Value as supplied.
        value: String,
    },
}
