//! # Vault Search
//!
//! Text, tag and frontmatter property search over a markdown vault.
//!
//! Provides:
//! - [`SearchQuery`]: a validated query holding exactly one mode
//! - [`SearchEngine`]: the text backend seam
//! - [`RipgrepEngine`]: streams `rg --json` output and stops the process at
//!   the result limit
//! - [`NativeEngine`]: in-process fallback with the same result shape
//! - [`EngineSelector`]: picks a backend per [`EngineMode`](linkvault_core::EngineMode)
//! - [`VaultSearch`]: routes tag and property queries to a frontmatter scan
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkvault_core::SearchConfig;
//! use linkvault_search::{EngineSelector, SearchEngine, SearchQuery};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> linkvault_core::Result<()> {
//! let engine = EngineSelector::new("/path/to/vault", &SearchConfig::default());
//! let query = SearchQuery::build("deadline", "", "", 10, -1, "projects", false)?;
//!
//! for hit in engine.search(&query, &CancellationToken::new()).await? {
//!     println!("{}:{}: {}", hit.path, hit.line, hit.snippet);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Results keep the backend's scan order. Neither engine ranks or sorts.

pub mod dispatch;
pub mod engine;
pub mod native;
pub mod parse;
pub mod query;
pub mod ripgrep;
pub mod selector;

pub use dispatch::{LIMIT_WARNING, VaultSearch, apply_snippet_max_chars};
pub use engine::{SearchEngine, absolute_root, require_text, resolve_search_root};
pub use native::{NativeEngine, SNIPPET_MAX_CHARS};
pub use parse::{parse_rg_line, trim_context};
pub use query::{DEFAULT_CONTEXT_CHARS, DEFAULT_LIMIT, QueryKind, SearchQuery, parse_prop_filter};
pub use ripgrep::{RipgrepEngine, StreamEnd, settle};
pub use selector::EngineSelector;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dispatch::VaultSearch;
    pub use crate::engine::SearchEngine;
    pub use crate::query::{QueryKind, SearchQuery};
    pub use crate::selector::EngineSelector;
    pub use linkvault_core::prelude::*;
}
