//! The search engine seam shared by the ripgrep and native engines.

use crate::query::SearchQuery;
use async_trait::async_trait;
use linkvault_core::prelude::*;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// A text search backend.
///
/// Results keep the backend's scan order. `cancel` carries the caller's
/// overall deadline; engines stop and return [`Error::Cancelled`] once it
/// fires.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Short backend name used in logs and error messages
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>>;
}

/// Absolute, lexically cleaned vault root.
pub fn absolute_root(root: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(root).map_err(Error::io)?;
    Ok(linkvault_core::normalize_path(&absolute))
}

/// Scope directory for a query: the vault root or `root/prefix`.
///
/// Fails with a validation error when the prefix resolves outside the root.
pub fn resolve_search_root(root: &Path, prefix: Option<&str>) -> Result<PathBuf> {
    let root = absolute_root(root)?;
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(root),
        Some(prefix) => PathValidator::resolve_within(&root, prefix)
            .map_err(|_| Error::validation_error("search path escapes vault root")),
    }
}

/// Text of a text query, or a validation error naming the engine.
pub fn require_text<'q>(engine: &str, query: &'q SearchQuery) -> Result<&'q str> {
    query.text_value().ok_or_else(|| {
        Error::validation_error(format!("{} engine supports text queries only", engine))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_search_root() {
        let root = Path::new("/vault");
        assert_eq!(resolve_search_root(root, None).unwrap(), PathBuf::from("/vault"));
        assert_eq!(resolve_search_root(root, Some("  ")).unwrap(), PathBuf::from("/vault"));
        assert_eq!(
            resolve_search_root(root, Some("notes/daily")).unwrap(),
            PathBuf::from("/vault/notes/daily")
        );
    }

    #[test]
    fn test_resolve_search_root_rejects_escape() {
        let err = resolve_search_root(Path::new("/vault"), Some("../outside")).unwrap_err();
        assert_eq!(err.to_string(), "validation error: search path escapes vault root");
        assert!(resolve_search_root(Path::new("/vault"), Some("a/../../b")).is_err());
    }

    #[test]
    fn test_require_text() {
        let tag = SearchQuery::build("", "x", "", 1, 1, "", false).unwrap();
        let err = require_text("native", &tag).unwrap_err();
        assert!(err.to_string().contains("native engine supports text queries only"));

        let text = SearchQuery::text("x").unwrap();
        assert_eq!(require_text("native", &text).unwrap(), "x");
    }
}
