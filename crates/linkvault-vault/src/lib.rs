//! # Vault Store
//!
//! Read-only document access for a markdown vault.
//!
//! [`store::DocumentStore`] is the seam the link graph and search layers
//! depend on:
//! - `exists` / `get_body` / `get_note` for single documents
//! - `list_all` for sorted corpus walks that skip hidden directories
//! - `modified` for index staleness and output metadata
//!
//! [`store::FsDocumentStore`] implements it over the local filesystem.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkvault_vault::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = FsDocumentStore::new("/path/to/vault");
//!     for doc in store.list_all().await? {
//!         let body = store.get_body(&doc).await?;
//!         println!("{}: {} bytes", doc, body.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{
    DocumentStore, FsDocumentStore, Note, is_hidden_dir, is_markdown_file, list_markdown_files,
    source_file_mtime_max,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::store::{DocumentStore, FsDocumentStore, Note};
    pub use linkvault_core::prelude::*;
}
