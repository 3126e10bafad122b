//! Routes a query to the text engine or to a frontmatter scan.

use crate::engine::{SearchEngine, absolute_root, resolve_search_root};
use crate::query::{QueryKind, SearchQuery};
use linkvault_core::prelude::*;
use linkvault_parser::{frontmatter_tags, get_property, normalize_tag, parse_tags, value_to_string};
use linkvault_vault::{DocumentStore, Note};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Warning attached to output whose result count reached the limit
pub const LIMIT_WARNING: &str = "result limit reached; output may be truncated";

/// Answers every query kind for one vault.
///
/// Text queries go to `engine`. Tag and property queries read notes from
/// `store` in sorted path order.
pub struct VaultSearch {
    store: Arc<dyn DocumentStore>,
    engine: Arc<dyn SearchEngine>,
}

impl VaultSearch {
    pub fn new(store: Arc<dyn DocumentStore>, engine: Arc<dyn SearchEngine>) -> Self {
        Self { store, engine }
    }

    #[instrument(skip(self, query, cancel), fields(query = %query), name = "vault_search")]
    pub async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        match query.kind() {
            QueryKind::Text { .. } => self.engine.search(query, cancel).await,
            QueryKind::Tag { tag } => {
                let wanted = normalize_tag(tag);
                if wanted.is_empty() {
                    return Ok(Vec::new());
                }
                self.scan_notes(query, cancel, |note| {
                    let found = frontmatter_tags(&note.frontmatter).contains(&wanted)
                        || parse_tags(&note.body).contains(&wanted);
                    found.then(|| SearchResult {
                        path: note.path.to_string(),
                        line: 0,
                        column: 0,
                        match_text: format!("#{}", wanted),
                        snippet: "tag match".to_string(),
                        match_type: MatchType::Tag,
                    })
                })
                .await
            }
            QueryKind::Prop { key, value } => {
                self.scan_notes(query, cancel, |note| {
                    let actual = value_to_string(get_property(&note.frontmatter, key)?);
                    (actual.to_lowercase() == value.to_lowercase()).then(|| SearchResult {
                        path: note.path.to_string(),
                        line: 0,
                        column: 0,
                        match_text: format!("{}={}", key, actual),
                        snippet: "frontmatter property match".to_string(),
                        match_type: MatchType::Prop,
                    })
                })
                .await
            }
        }
    }

    /// Apply `matcher` to every note under the query's path prefix.
    ///
    /// An unreadable note fails the whole scan.
    async fn scan_notes<F>(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
        matcher: F,
    ) -> Result<Vec<SearchResult>>
    where
        F: Fn(&Note) -> Option<SearchResult>,
    {
        let prefix = self.relative_prefix(query)?;
        let mut results = Vec::new();

        for doc in self.store.list_all().await? {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if !under_prefix(doc.as_str(), &prefix) {
                continue;
            }
            let note = self.store.get_note(&doc).await?;
            if let Some(result) = matcher(&note) {
                results.push(result);
                if results.len() >= query.limit() {
                    break;
                }
            }
        }
        Ok(results)
    }

    /// Validated prefix as a vault-relative slash path, empty for the root
    fn relative_prefix(&self, query: &SearchQuery) -> Result<String> {
        let root = absolute_root(self.store.root())?;
        let scope = resolve_search_root(self.store.root(), query.path_prefix())?;
        Ok(PathValidator::relative_slash_path(&root, &scope))
    }
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Cap every snippet at `max` characters; 0 leaves them untouched.
pub fn apply_snippet_max_chars(results: &mut [SearchResult], max: usize) {
    if max == 0 {
        return;
    }
    for result in results.iter_mut() {
        if let Some((cut, _)) = result.snippet.char_indices().nth(max) {
            result.snippet.truncate(cut);
        }
    }
}
