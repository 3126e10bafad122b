//! [`NeighborSource`] over a document store and the backlink cache.

use crate::cache::{BacklinkCache, CacheStatus};
use crate::expander::NeighborSource;
use async_trait::async_trait;
use linkvault_core::prelude::*;
use linkvault_parser::parse_wikilinks;
use linkvault_vault::DocumentStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reads outgoing links from note bodies and backlinks from the cached
/// index, building the index on first use.
pub struct VaultNeighbors {
    store: Arc<dyn DocumentStore>,
    cache: Arc<BacklinkCache>,
    last_status: Mutex<Option<CacheStatus>>,
}

impl VaultNeighbors {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<BacklinkCache>) -> Self {
        Self {
            store,
            cache,
            last_status: Mutex::new(None),
        }
    }

    /// How the backlink index was last obtained, if it was needed at all
    pub async fn cache_status(&self) -> Option<CacheStatus> {
        *self.last_status.lock().await
    }
}

#[async_trait]
impl NeighborSource for VaultNeighbors {
    async fn exists(&self, path: &str) -> Result<bool> {
        let doc = DocumentRef::parse(path)?;
        self.store.exists(&doc).await
    }

    async fn outgoing_links(&self, path: &str) -> Result<Vec<String>> {
        let doc = DocumentRef::parse(path)?;
        let body = self.store.get_body(&doc).await?;
        Ok(parse_wikilinks(&body))
    }

    async fn backlinks(&self, path: &str) -> Result<Vec<String>> {
        let doc = DocumentRef::parse(path)?;
        let (index, status) = self.cache.get_or_build(self.store.as_ref(), false).await?;
        let mut last = self.last_status.lock().await;
        if last.is_none() || status != CacheStatus::Hit {
            *last = Some(status);
        }
        Ok(index.backlinks_for(&doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkvault_vault::FsDocumentStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_vault_neighbors() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(temp_dir.path().join("a.md"), "[[B]] and [[c|see]]")
            .await
            .unwrap();
        tokio::fs::write(temp_dir.path().join("b.md"), "").await.unwrap();

        let neighbors = VaultNeighbors::new(
            Arc::new(FsDocumentStore::new(temp_dir.path())),
            Arc::new(BacklinkCache::new()),
        );
        assert!(neighbors.exists("a.md").await.unwrap());
        assert!(!neighbors.exists("c.md").await.unwrap());
        assert_eq!(neighbors.outgoing_links("a.md").await.unwrap(), vec!["b", "c"]);
        assert!(neighbors.cache_status().await.is_none());

        assert_eq!(neighbors.backlinks("b.md").await.unwrap(), vec!["a.md"]);
        assert_eq!(neighbors.cache_status().await, Some(CacheStatus::Built));
        neighbors.backlinks("a.md").await.unwrap();
        assert_eq!(neighbors.cache_status().await, Some(CacheStatus::Built));
    }

    #[tokio::test]
    async fn test_escaping_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let neighbors = VaultNeighbors::new(
            Arc::new(FsDocumentStore::new(temp_dir.path())),
            Arc::new(BacklinkCache::new()),
        );
        assert!(neighbors.exists("../outside.md").await.is_err());
    }
}
