//! Backlink index: forward and inverse wikilink maps over a whole vault.

use chrono::{DateTime, Utc};
use linkvault_core::prelude::*;
use linkvault_parser::{normalize_link_target, parse_wikilinks};
use linkvault_vault::DocumentStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::SystemTime;
use tracing::instrument;

/// Forward (`source -> link keys`) and inverse (`link key -> sources`) maps.
///
/// Sources are vault-relative paths as listed by the store. Both maps are
/// exact inverses of each other: `k` is in `source_to_target[s]` iff `s` is
/// in `target_to_source[k]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklinkIndex {
    pub built_at: DateTime<Utc>,
    pub source_to_target: BTreeMap<String, BTreeSet<String>>,
    /// Sorted source lists
    pub target_to_source: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_mtime_max: Option<DateTime<Utc>>,
}

/// Summary counts of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub links: usize,
    pub targets: usize,
}

impl BacklinkIndex {
    /// Empty index stamped with the current time
    pub fn empty() -> Self {
        Self {
            built_at: Utc::now(),
            source_to_target: BTreeMap::new(),
            target_to_source: BTreeMap::new(),
            file_mtime_max: None,
        }
    }

    /// Build from every document of `store`.
    ///
    /// Any unreadable document aborts the build; no partial index is ever
    /// returned. Modification times that cannot be read only leave
    /// `file_mtime_max` unaffected.
    #[instrument(skip(store), fields(root = %store.root().display()), name = "backlink_index_build")]
    pub async fn build(store: &dyn DocumentStore) -> Result<Self> {
        let mut index = Self::empty();
        let mut mtime_max: Option<SystemTime> = None;

        for doc in store.list_all().await? {
            if let Ok(mtime) = store.modified(&doc).await {
                mtime_max = Some(mtime_max.map_or(mtime, |current| current.max(mtime)));
            }
            let body = store.get_body(&doc).await?;
            index.insert_document(doc.as_str(), parse_wikilinks(&body));
        }

        for sources in index.target_to_source.values_mut() {
            sources.sort();
        }
        index.file_mtime_max = mtime_max.map(DateTime::<Utc>::from);

        let stats = index.stats();
        log::debug!(
            "Built backlink index: {} documents, {} links, {} targets",
            stats.documents,
            stats.links,
            stats.targets
        );
        Ok(index)
    }

    fn insert_document(&mut self, source: &str, targets: Vec<String>) {
        for target in &targets {
            self.target_to_source
                .entry(target.clone())
                .or_default()
                .push(source.to_string());
        }
        self.source_to_target
            .insert(source.to_string(), targets.into_iter().collect());
    }

    /// Documents linking to `doc`, by full path key or bare stem key.
    ///
    /// Sorted and deduplicated.
    pub fn backlinks_for(&self, doc: &DocumentRef) -> Vec<String> {
        let full = normalize_link_target(&doc.key());
        let stem = normalize_link_target(&doc.stem_key());

        let mut combined: BTreeSet<&str> = BTreeSet::new();
        for key in [full, stem] {
            if let Some(sources) = self.target_to_source.get(&key) {
                combined.extend(sources.iter().map(String::as_str));
            }
        }
        combined.into_iter().map(str::to_string).collect()
    }

    /// Link keys `doc` points at, empty when the document is unknown.
    pub fn outgoing_for(&self, doc: &DocumentRef) -> Vec<String> {
        self.source_to_target
            .get(doc.as_str())
            .map(|targets| targets.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// True when a document changed after the newest mtime seen at build.
    pub fn is_stale(&self, observed_mtime_max: Option<DateTime<Utc>>) -> bool {
        match (self.file_mtime_max, observed_mtime_max) {
            (Some(built), Some(observed)) => observed > built,
            (None, Some(_)) => true,
            (_, None) => false,
        }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.source_to_target.len(),
            links: self.source_to_target.values().map(BTreeSet::len).sum(),
            targets: self.target_to_source.len(),
        }
    }
}
