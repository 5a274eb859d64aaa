//! # scoped-commits
//!
//! Narrows a repository's commit history to the commits that concern one
//! package of a monorepo.
//!
//! A commit belongs to a package when any file it touched lies under the
//! package directory, or under one of the dependency directories listed in
//! the configuration. Changed-file lists are fetched from git with bounded
//! concurrency and memoized per commit.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scoped_commits::config::ScopeConfig;
//! use scoped_commits::git::{GitDiffTreeLister, GitRepository};
//! use scoped_commits::scope::PackageScope;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let repo = GitRepository::open()?;
//! let root = repo.root()?;
//! let commits = repo.get_commits_in_range("HEAD")?;
//!
//! let config = ScopeConfig::load(&root)?;
//! let scope = PackageScope::discover(&root, &config, GitDiffTreeLister::new(&root))?;
//! let count = scope
//!     .with_only_package_commits(commits, |filtered| async move { Ok(filtered.len()) })
//!     .await?;
//! println!("{count} commits touch {}", scope.package().name);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod scope;

pub use crate::cli::Cli;
pub use crate::error::ScopeError;

/// The current version of scoped-commits.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
