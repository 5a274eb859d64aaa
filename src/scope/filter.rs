//! Package membership test for enriched commits.

use tracing::debug;

use crate::git::EnrichedCommit;
use crate::scope::path::{normalize_segments, RepoPath};

/// Returns the first file of `commit` that lies under the package root or
/// under one of the dependency roots.
pub fn matching_file<'c>(
    package_root: &RepoPath,
    dependencies: &[RepoPath],
    commit: &'c EnrichedCommit,
) -> Option<&'c str> {
    commit.files.iter().map(String::as_str).find(|file| {
        let segments = normalize_segments(file);
        package_root.contains_segments(&segments)
            || dependencies
                .iter()
                .any(|dependency| dependency.contains_segments(&segments))
    })
}

/// Keeps the commits that touched the package or one of its dependencies.
///
/// Relative order of the surviving commits is preserved.
pub fn filter_commits(
    package_root: &RepoPath,
    dependencies: &[RepoPath],
    commits: Vec<EnrichedCommit>,
) -> Vec<EnrichedCommit> {
    debug!(package = %package_root, "Filtering commits by package path");
    if !dependencies.is_empty() {
        let dependencies: Vec<String> = dependencies.iter().map(ToString::to_string).collect();
        debug!(?dependencies, "Including changes under dependency paths");
    }

    commits
        .into_iter()
        .filter(|commit| match matching_file(package_root, dependencies, commit) {
            Some(file) => {
                debug!(
                    commit = %commit.commit.short_hash(),
                    subject = %commit.commit.subject,
                    file = %file,
                    "Including commit"
                );
                true
            }
            None => false,
        })
        .collect()
}
