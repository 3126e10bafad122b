//! Core data models shared by the parser, graph and search crates.

use crate::error::{Error, Result};
use crate::utils::clean_slash_path;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A normalized, vault-relative document path.
///
/// Forward slashes, `.md` suffix enforced, display case preserved. Link
/// resolution compares [`DocumentRef::key`] and [`DocumentRef::stem_key`],
/// both lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

impl DocumentRef {
    /// Normalize a user or link supplied path.
    ///
    /// Fails when the path is empty or climbs above the vault root after
    /// cleaning.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().replace('\\', "/");
        let trimmed = trimmed.trim_start_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            return Err(Error::invalid_path("note path is required"));
        }
        let mut normalized = trimmed.to_string();
        if !normalized.to_lowercase().ends_with(".md") {
            normalized.push_str(".md");
        }
        let cleaned = clean_slash_path(&normalized);
        if cleaned == ".." || cleaned.starts_with("../") {
            return Err(Error::path_traversal(raw.trim()));
        }
        Ok(Self(cleaned))
    }

    /// Build from a path relative to the vault root.
    pub fn from_relative(rel: &Path) -> Result<Self> {
        let joined = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self::parse(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase link key of the full path without `.md`.
    pub fn key(&self) -> String {
        strip_md(&self.0).to_lowercase()
    }

    /// Lowercase link key of the bare file stem.
    pub fn stem_key(&self) -> String {
        let base = self.0.rsplit('/').next().unwrap_or(&self.0);
        strip_md(base).to_lowercase()
    }

    /// Title derived from the file stem, case preserved.
    pub fn title(&self) -> &str {
        let base = self.0.rsplit('/').next().unwrap_or(&self.0);
        strip_md(base)
    }

    /// Absolute location under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.0.split('/') {
            path.push(segment);
        }
        path
    }
}

fn strip_md(value: &str) -> &str {
    match value.len().checked_sub(3) {
        Some(cut) if value.get(cut..).is_some_and(|ext| ext.eq_ignore_ascii_case(".md")) => {
            &value[..cut]
        }
        _ => value,
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a search result matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Text,
    Tag,
    Prop,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Vault-relative path with forward slashes
    pub path: String,
    /// 1-based line, 0 when the match is not line oriented
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub column: usize,
    #[serde(rename = "match")]
    pub match_text: String,
    pub snippet: String,
    pub match_type: MatchType,
}

/// Kind of relation a graph edge records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Forward wikilink from `from` to `to`
    LinksTo,
    /// Backlink: `from` links to `to`, discovered from `to`'s side
    LinkedTo,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::LinksTo => "links_to",
            EdgeKind::LinkedTo => "linked_to",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node of an expanded neighborhood graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub path: String,
    pub is_seed: bool,
    pub score: i64,
    pub in_degree: usize,
    pub out_degree: usize,
}

impl GraphNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_seed: false,
            score: 0,
            in_degree: 0,
            out_degree: 0,
        }
    }
}

/// Directed edge of an expanded neighborhood graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Provenance attached to command output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMetadata {
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file_mtime_max: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cache_status: String,
    pub truncated: bool,
    pub strict: bool,
}

impl OperationMetadata {
    pub fn new(strict: bool) -> Self {
        Self {
            generated_at: format_timestamp(Utc::now()),
            source_file_mtime_max: None,
            cache_status: String::new(),
            truncated: false,
            strict,
        }
    }

    pub fn with_cache_status(mut self, status: impl Into<String>) -> Self {
        self.cache_status = status.into();
        self
    }

    pub fn with_source_mtime(mut self, mtime: Option<DateTime<Utc>>) -> Self {
        self.source_file_mtime_max = mtime.map(format_timestamp);
        self
    }
}

/// RFC 3339 with second precision, UTC
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
