//! Memoized changed-file lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use tokio::sync::OnceCell;

use crate::git::FileLister;

type Entry = Arc<OnceCell<Arc<[String]>>>;

/// Caches changed-file lists by commit hash.
///
/// Entries are written once and never evicted. Concurrent fetches of the
/// same uncached hash wait on a single lookup. A failed lookup leaves the
/// entry empty so the next fetch tries again.
pub struct CommitFilesCache<L> {
    lister: L,
    entries: Mutex<HashMap<String, Entry>>,
}

impl<L: FileLister> CommitFilesCache<L> {
    /// Wraps `lister` with an empty cache.
    pub fn new(lister: L) -> Self {
        Self {
            lister,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the files changed by `hash`, looking them up at most once.
    pub async fn fetch(&self, hash: &str) -> Result<Arc<[String]>> {
        let entry = self.entry(hash);
        let files = entry
            .get_or_try_init(|| async {
                let files = self.lister.changed_files(hash).await?;
                Ok::<_, anyhow::Error>(Arc::<[String]>::from(files))
            })
            .await?;

        Ok(Arc::clone(files))
    }

    /// Drops every cached entry.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Number of commits with a cache slot.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing has been fetched since creation or reset.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, hash: &str) -> Entry {
        Arc::clone(self.lock().entry(hash.to_string()).or_default())
    }

    // The map is only touched between awaits, a panic cannot leave it half
    // updated.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
