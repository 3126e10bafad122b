//! Document store: the narrow read surface the link graph and search layers
//! consume.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use linkvault_core::prelude::*;
use linkvault_parser::split_frontmatter;
use serde_yaml::Mapping;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::instrument;
use walkdir::WalkDir;

/// A note read from the vault.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub path: DocumentRef,
    pub title: String,
    pub frontmatter: Mapping,
    pub body: String,
}

/// Read access to the documents of one vault.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Vault root directory
    fn root(&self) -> &Path;

    /// Whether the document exists as a regular file
    async fn exists(&self, doc: &DocumentRef) -> Result<bool>;

    /// Body of the document with any frontmatter removed
    async fn get_body(&self, doc: &DocumentRef) -> Result<String> {
        Ok(self.get_note(doc).await?.body)
    }

    /// Full note: frontmatter and body
    async fn get_note(&self, doc: &DocumentRef) -> Result<Note>;

    /// Every markdown document, sorted, hidden directories skipped
    async fn list_all(&self) -> Result<Vec<DocumentRef>>;

    /// Last modification time
    async fn modified(&self, doc: &DocumentRef) -> Result<SystemTime>;
}

/// [`DocumentStore`] over a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn not_found(doc: &DocumentRef, err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::NotFound {
            Error::not_found(doc.as_str())
        } else {
            Error::io(err)
        }
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn exists(&self, doc: &DocumentRef) -> Result<bool> {
        match tokio::fs::metadata(doc.to_path(&self.root)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(e)),
        }
    }

    #[instrument(skip(self, doc), fields(doc = %doc), name = "store_get_note")]
    async fn get_note(&self, doc: &DocumentRef) -> Result<Note> {
        let raw = tokio::fs::read_to_string(doc.to_path(&self.root))
            .await
            .map_err(|e| Self::not_found(doc, e))?;
        let split = split_frontmatter(&raw).map_err(|e| {
            Error::validation_error(format!("failed to parse frontmatter in {}: {}", doc, e))
        })?;
        Ok(Note {
            title: doc.title().to_string(),
            path: doc.clone(),
            frontmatter: split.frontmatter,
            body: split.body,
        })
    }

    #[instrument(skip(self), name = "store_list_all")]
    async fn list_all(&self) -> Result<Vec<DocumentRef>> {
        let root = self.root.clone();
        let docs = tokio::task::spawn_blocking(move || list_markdown_files(&root))
            .await
            .map_err(|e| Error::other(format!("listing task failed: {}", e)))??;
        log::debug!("Found {} markdown files under {}", docs.len(), self.root.display());
        Ok(docs)
    }

    async fn modified(&self, doc: &DocumentRef) -> Result<SystemTime> {
        let meta = tokio::fs::metadata(doc.to_path(&self.root))
            .await
            .map_err(|e| Self::not_found(doc, e))?;
        meta.modified().map_err(Error::io)
    }
}

/// True for directory names that the vault walk skips.
pub fn is_hidden_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/// True for files with a `.md` extension, any case.
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Walk `root` for markdown files, hidden directories skipped, sorted.
pub fn list_markdown_files(root: &Path) -> Result<Vec<DocumentRef>> {
    let mut docs = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_hidden_dir(e)) {
        let entry = entry.map_err(|e| Error::io(e.into()))?;
        if !entry.file_type().is_file() || !is_markdown_file(entry.path()) {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        docs.push(DocumentRef::from_relative(rel)?);
    }
    docs.sort();
    Ok(docs)
}

/// Latest modification time across every document in the store.
///
/// Documents whose metadata cannot be read are ignored.
pub async fn source_file_mtime_max(store: &dyn DocumentStore) -> Result<Option<DateTime<Utc>>> {
    let mut latest: Option<SystemTime> = None;
    for doc in store.list_all().await? {
        if let Ok(mtime) = store.modified(&doc).await {
            latest = Some(latest.map_or(mtime, |current| current.max(mtime)));
        }
    }
    Ok(latest.map(DateTime::<Utc>::from))
}
