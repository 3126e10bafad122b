//! Shared utilities for operations across linkvault crates.
//!
//! Provides helpers for:
//! - Serialization with consistent error handling
//! - Lexical path cleaning
//! - Vault containment checks

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Generic JSON serialization with consistent error handling
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::other(format!("failed to serialize {} as JSON: {}", context, e)))
}

/// Lexically clean a forward-slash path.
///
/// Collapses repeated separators, drops `.` segments and resolves `..`
/// against preceding segments. Leading `..` segments of a relative path are
/// kept. An empty result becomes `"."`.
pub fn clean_slash_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Lexically normalize a filesystem path without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(name) => normalized.push(name),
            Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::Prefix(p) => normalized.push(p.as_os_str()),
        }
    }
    normalized
}

/// Path validation helpers
pub struct PathValidator;

impl PathValidator {
    /// Resolve `rel` under `vault_root`, rejecting anything that escapes it.
    ///
    /// The check is lexical: the cleaned candidate must equal the cleaned
    /// root or lie below it. A leading `/` on `rel` is relative to the root.
    pub fn resolve_within(vault_root: &Path, rel: &str) -> Result<PathBuf> {
        let root = normalize_path(vault_root);
        let rel = rel.trim();
        if rel.is_empty() {
            return Ok(root);
        }
        let slashed = rel.replace('\\', "/");
        let candidate = normalize_path(&root.join(slashed.trim_start_matches('/')));
        if !Self::is_contained(&root, &candidate) {
            return Err(Error::path_traversal(rel));
        }
        Ok(candidate)
    }

    /// True when `candidate` is `root` or lies below it.
    pub fn is_contained(root: &Path, candidate: &Path) -> bool {
        candidate == root || candidate.starts_with(root)
    }

    /// Vault-relative forward-slash form of an absolute path under `root`.
    pub fn relative_slash_path(root: &Path, path: &Path) -> String {
        let rel = path.strip_prefix(root).unwrap_or(path);
        rel.components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
