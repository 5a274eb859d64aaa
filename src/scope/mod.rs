//! Scoping commit history to a single package.
//!
//! Commits are enriched with the files they touched, then kept only when one
//! of those files lies under the package root or a configured dependency
//! root. Matching compares whole path segments, so `packages/foo` never
//! matches `packages/foobar`.

pub mod cache;
pub mod enrich;
pub mod filter;
pub mod package;
pub mod path;
pub mod pipeline;

pub use cache::CommitFilesCache;
pub use enrich::Enricher;
pub use filter::{filter_commits, matching_file};
pub use package::PackageInfo;
pub use path::RepoPath;
pub use pipeline::PackageScope;
