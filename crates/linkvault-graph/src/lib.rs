//! # Link Graph
//!
//! Backlink indexing and neighborhood expansion for markdown vaults.
//!
//! Provides:
//! - [`BacklinkIndex`]: forward and inverse wikilink maps built from a
//!   [`DocumentStore`](linkvault_vault::DocumentStore)
//! - [`BacklinkCache`]: shared index cache with readers/writer locking
//! - [`GraphExpander`]: bounded BFS over outgoing links and backlinks
//! - [`VaultNeighbors`]: the neighbor source wiring the three together
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkvault_graph::{BacklinkCache, ExpandOptions, GraphExpander, VaultNeighbors};
//! use linkvault_vault::FsDocumentStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> linkvault_core::Result<()> {
//! let store = Arc::new(FsDocumentStore::new("/path/to/vault"));
//! let neighbors = VaultNeighbors::new(store, Arc::new(BacklinkCache::new()));
//! let expander = GraphExpander::new(&neighbors, ExpandOptions::default());
//!
//! let graph = expander.expand(&["notes/start.md"]).await?;
//! for edge in &graph.edges {
//!     println!("{} -{}-> {}", edge.from, edge.kind, edge.to);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! - **Link key**: lowercase, extension-less target of a wikilink
//! - **Backlinks**: documents whose links resolve to a note by full path or
//!   by bare file stem
//! - **Truncation**: the node limit refused an insertion; reported as a
//!   warning plus `truncated = true`, never as an error

pub mod cache;
pub mod expander;
pub mod index;
pub mod neighbors;

pub use cache::{BacklinkCache, CacheStatus};
pub use expander::{
    ExpandOptions, GraphExpander, GraphExpansion, NODE_LIMIT_WARNING, NeighborSource, SEED_BONUS,
    normalize_graph_path, seed_paths_from_results,
};
pub use index::{BacklinkIndex, IndexStats};
pub use neighbors::VaultNeighbors;
