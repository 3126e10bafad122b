//! In-process text search used when ripgrep is not installed.

use crate::engine::{SearchEngine, absolute_root, require_text, resolve_search_root};
use crate::query::SearchQuery;
use async_trait::async_trait;
use linkvault_core::prelude::*;
use linkvault_vault::{is_hidden_dir, is_markdown_file};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use walkdir::WalkDir;

/// Snippets longer than this many characters are cut
pub const SNIPPET_MAX_CHARS: usize = 120;

/// Substring scanner over the vault's markdown files.
///
/// Files are visited in walk order (sorted by name within a directory) and
/// every matching line yields one result.
#[derive(Debug, Clone)]
pub struct NativeEngine {
    vault_root: PathBuf,
}

impl NativeEngine {
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        Self {
            vault_root: vault_root.into(),
        }
    }
}

#[async_trait]
impl SearchEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    #[instrument(skip(self, query, cancel), fields(query = %query, limit = query.limit()), name = "native_search")]
    async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        let text = require_text(self.name(), query)?.to_string();
        let root = absolute_root(&self.vault_root)?;
        let scope = resolve_search_root(&self.vault_root, query.path_prefix())?;
        let limit = query.limit();
        let case_sensitive = query.case_sensitive();
        let cancel = cancel.clone();

        tokio::task::spawn_blocking(move || {
            scan(&root, &scope, &text, limit, case_sensitive, &cancel)
        })
        .await
        .map_err(|e| Error::other(format!("native search task failed: {}", e)))?
    }
}

fn scan(
    root: &Path,
    scope: &Path,
    text: &str,
    limit: usize,
    case_sensitive: bool,
    cancel: &CancellationToken,
) -> Result<Vec<SearchResult>> {
    let needle = if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    };
    let mut results = Vec::new();

    let walker = WalkDir::new(scope)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e));

    'walk: for entry in walker {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let Ok(entry) = entry else {
            continue;
        };
        if !entry.file_type().is_file() || !is_markdown_file(entry.path()) {
            continue;
        }
        let Ok(bytes) = std::fs::read(entry.path()) else {
            log::trace!("Skipping unreadable file {}", entry.path().display());
            continue;
        };
        let content = String::from_utf8_lossy(&bytes);
        let rel = PathValidator::relative_slash_path(root, entry.path());

        for (index, line) in content.split('\n').enumerate() {
            let Some(column) = find_column(line, &needle, case_sensitive) else {
                continue;
            };
            let snippet = cap_snippet(line.trim());
            results.push(SearchResult {
                path: rel.clone(),
                line: index + 1,
                column,
                match_text: snippet.clone(),
                snippet,
                match_type: MatchType::Text,
            });
            if results.len() >= limit {
                break 'walk;
            }
        }
    }

    Ok(results)
}

/// 1-based character column of the first hit of `needle` in `line`.
fn find_column(line: &str, needle: &str, case_sensitive: bool) -> Option<usize> {
    if case_sensitive {
        let byte = line.find(needle)?;
        return Some(line[..byte].chars().count() + 1);
    }
    // lowercasing can change byte lengths, so count on the lowered line
    let lowered = line.to_lowercase();
    let byte = lowered.find(needle)?;
    Some(lowered[..byte].chars().count() + 1)
}

fn cap_snippet(line: &str) -> String {
    if line.chars().count() <= SNIPPET_MAX_CHARS {
        return line.to_string();
    }
    let mut snippet: String = line.chars().take(SNIPPET_MAX_CHARS).collect();
    snippet.push('…');
    snippet
}
