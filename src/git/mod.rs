//! Git operations and repository management.

pub mod commit;
pub mod files;
pub mod repository;

pub use commit::{Commit, EnrichedCommit};
pub use files::{FileLister, GitDiffTreeLister};
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
