//! Adapter placing the package filter in front of a downstream step.

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ScopeConfig;
use crate::git::{Commit, EnrichedCommit, FileLister};
use crate::scope::enrich::Enricher;
use crate::scope::filter::filter_commits;
use crate::scope::package::PackageInfo;
use crate::scope::RepoPath;

/// Restricts commit lists to one package of a monorepo.
pub struct PackageScope<L> {
    package: PackageInfo,
    dependencies: Vec<RepoPath>,
    enricher: Enricher<L>,
}

impl<L: FileLister> PackageScope<L> {
    /// Creates a scope for an already resolved package.
    pub fn new(package: PackageInfo, config: &ScopeConfig, lister: L) -> Self {
        Self {
            package,
            dependencies: config.dependencies.clone(),
            enricher: Enricher::new(lister, config.concurrency),
        }
    }

    /// Resolves the package containing the current directory.
    pub fn discover(repo_root: &Path, config: &ScopeConfig, lister: L) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::discover_from(&cwd, repo_root, config, lister)
    }

    /// Resolves the package containing `start_dir`.
    pub fn discover_from(
        start_dir: &Path,
        repo_root: &Path,
        config: &ScopeConfig,
        lister: L,
    ) -> Result<Self> {
        let package = PackageInfo::resolve(start_dir, repo_root, &config.manifest_file)?;
        Ok(Self::new(package, config, lister))
    }

    /// The package being scoped.
    pub fn package(&self) -> &PackageInfo {
        &self.package
    }

    /// Dependency roots whose changes also count.
    pub fn dependencies(&self) -> &[RepoPath] {
        &self.dependencies
    }

    /// The enricher, including its file-list cache.
    pub fn enricher(&self) -> &Enricher<L> {
        &self.enricher
    }

    /// Enriches `commits` and keeps those touching the package.
    pub async fn filter_package_commits(&self, commits: Vec<Commit>) -> Result<Vec<EnrichedCommit>> {
        let enriched = self.enricher.enrich(commits).await?;
        Ok(filter_commits(
            &self.package.root,
            &self.dependencies,
            enriched,
        ))
    }

    /// Reports how many commits were found for the package.
    pub fn log_package_commits(&self, commits: &[EnrichedCommit]) {
        info!(
            package = %self.package.name,
            count = commits.len(),
            "Found {} commits for package {} since last release",
            commits.len(),
            self.package.name
        );
    }

    /// Filters `commits`, logs the count and hands the result to `downstream`.
    ///
    /// Errors from either stage or from `downstream` are returned as is.
    pub async fn with_only_package_commits<T, F, Fut>(
        &self,
        commits: Vec<Commit>,
        downstream: F,
    ) -> Result<T>
    where
        F: FnOnce(Vec<EnrichedCommit>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let filtered = self.filter_package_commits(commits).await?;
        self.log_package_commits(&filtered);
        downstream(filtered).await
    }
}
