//! Concurrency-bounded enrichment of commits with their changed files.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::ConcurrencyLimit;
use crate::git::{Commit, EnrichedCommit, FileLister};
use crate::scope::cache::CommitFilesCache;

/// Attaches changed-file lists to commits through a shared cache.
pub struct Enricher<L> {
    cache: CommitFilesCache<L>,
    limit: ConcurrencyLimit,
}

impl<L: FileLister> Enricher<L> {
    /// Creates an enricher with its own empty cache.
    pub fn new(lister: L, limit: ConcurrencyLimit) -> Self {
        Self {
            cache: CommitFilesCache::new(lister),
            limit,
        }
    }

    /// Returns the cache backing this enricher.
    pub fn cache(&self) -> &CommitFilesCache<L> {
        &self.cache
    }

    /// Returns the configured in-flight bound.
    pub fn limit(&self) -> ConcurrencyLimit {
        self.limit
    }

    /// Enriches every commit, in input order.
    ///
    /// At most `limit` lookups run at once; the rest queue for a permit. The
    /// first failed lookup fails the whole batch.
    pub async fn enrich(&self, commits: Vec<Commit>) -> Result<Vec<EnrichedCommit>> {
        debug!(
            commits = commits.len(),
            limit = self.limit.get(),
            "Fetching changed files"
        );

        let semaphore = Arc::new(Semaphore::new(self.limit.get()));

        let futs = commits.into_iter().map(|commit| {
            let sem = semaphore.clone();
            async move {
                let _permit = sem
                    .acquire()
                    .await
                    .map_err(|e| anyhow::anyhow!("semaphore closed: {e}"))?;

                let files = self.cache.fetch(&commit.hash).await?;
                Ok::<_, anyhow::Error>(EnrichedCommit::new(commit, files))
            }
        });

        futures::future::try_join_all(futs).await
    }
}
