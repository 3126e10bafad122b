//! In-memory backlink index cache keyed by vault root.
//!
//! The cache is an explicit service object handed to the callers that need
//! it. Readers share a read lock; a rebuild happens with no lock held and
//! only the final swap takes the write lock, so a reader sees either the old
//! index or the new one, never a partial build.

use crate::index::BacklinkIndex;
use linkvault_core::Result;
use linkvault_vault::DocumentStore;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// How an index was obtained from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from an existing entry
    Hit,
    /// No entry existed; built and stored
    Built,
    /// Entry replaced on request
    Rebuilt,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Built => "built",
            CacheStatus::Rebuilt => "rebuilt",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared map from vault root to its latest backlink index.
#[derive(Debug, Default)]
pub struct BacklinkCache {
    entries: RwLock<HashMap<PathBuf, Arc<BacklinkIndex>>>,
}

impl BacklinkCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached index for `root`, if any
    pub async fn get(&self, root: &Path) -> Option<Arc<BacklinkIndex>> {
        self.entries.read().await.get(root).cloned()
    }

    /// Store `index` for `root`, replacing any previous entry
    pub async fn insert(&self, root: &Path, index: BacklinkIndex) -> Arc<BacklinkIndex> {
        let index = Arc::new(index);
        self.entries
            .write()
            .await
            .insert(root.to_path_buf(), Arc::clone(&index));
        index
    }

    /// Drop the entry for `root`
    pub async fn invalidate(&self, root: &Path) -> bool {
        self.entries.write().await.remove(root).is_some()
    }

    /// Return the cached index for the store's root, building it on a miss.
    ///
    /// With `rebuild` set the index is always rebuilt. The cache never
    /// compares modification times itself; a stale entry is served until a
    /// caller asks for a rebuild. A failed build leaves the existing entry in
    /// place.
    pub async fn get_or_build(
        &self,
        store: &dyn DocumentStore,
        rebuild: bool,
    ) -> Result<(Arc<BacklinkIndex>, CacheStatus)> {
        let root = store.root();
        let existing = self.get(root).await;
        if !rebuild && let Some(index) = existing {
            log::debug!("Backlink cache hit for {}", root.display());
            return Ok((index, CacheStatus::Hit));
        }

        let index = BacklinkIndex::build(store).await?;
        let status = if existing.is_some() {
            CacheStatus::Rebuilt
        } else {
            CacheStatus::Built
        };
        log::debug!("Backlink cache {} for {}", status, root.display());
        Ok((self.insert(root, index).await, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkvault_vault::FsDocumentStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_or_build_statuses() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(temp_dir.path().join("a.md"), "[[b]]").await.unwrap();
        let store = FsDocumentStore::new(temp_dir.path());
        let cache = BacklinkCache::new();

        let (_, status) = cache.get_or_build(&store, false).await.unwrap();
        assert_eq!(status, CacheStatus::Built);

        let (_, status) = cache.get_or_build(&store, false).await.unwrap();
        assert_eq!(status, CacheStatus::Hit);

        let (_, status) = cache.get_or_build(&store, true).await.unwrap();
        assert_eq!(status, CacheStatus::Rebuilt);
    }

    #[tokio::test]
    async fn test_failed_build_keeps_previous_entry() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(temp_dir.path().join("a.md"), "[[b]]").await.unwrap();
        let store = FsDocumentStore::new(temp_dir.path());
        let cache = BacklinkCache::new();
        let (first, _) = cache.get_or_build(&store, false).await.unwrap();

        tokio::fs::write(temp_dir.path().join("bad.md"), "---\nx: [\n---\n")
            .await
            .unwrap();
        assert!(cache.get_or_build(&store, true).await.is_err());

        let kept = cache.get(temp_dir.path()).await.unwrap();
        assert!(Arc::ptr_eq(&first, &kept));
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = BacklinkCache::new();
        let root = Path::new("/vault");
        cache.insert(root, BacklinkIndex::empty()).await;
        assert!(cache.invalidate(root).await);
        assert!(cache.get(root).await.is_none());
        assert!(!cache.invalidate(root).await);
    }
}
