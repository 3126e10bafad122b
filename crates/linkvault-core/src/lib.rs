//! # linkvault core
//!
//! Core data models, error types, and configuration shared by every
//! linkvault crate.
//!
//! ## Core Modules
//!
//! - [`models`] - Document paths, search results, graph nodes and edges
//! - [`error`] - Error type, `Result` alias and exit codes
//! - [`config`] - Configuration structures and defaults
//! - [`strict`] - Strict-mode policy applied on top of reported warnings
//! - [`utils`] - Path cleaning and vault containment
//!
//! ## Usage Examples
//!
//! ```
//! use linkvault_core::prelude::*;
//!
//! let doc = DocumentRef::parse("Projects/Plan").unwrap();
//! assert_eq!(doc.as_str(), "Projects/Plan.md");
//! assert_eq!(doc.key(), "projects/plan");
//! assert_eq!(doc.stem_key(), "plan");
//! ```
//!
//! ```
//! use linkvault_core::prelude::*;
//!
//! fn lookup() -> Result<()> {
//!     Err(Error::not_found("missing.md"))
//! }
//! assert_eq!(lookup().unwrap_err().exit_code(), 3);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod strict;
pub mod utils;

pub use config::*;
pub use error::{Error, Result};
pub use models::*;
pub use utils::{PathValidator, clean_slash_path, normalize_path, to_json_string};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{EngineMode, GraphConfig, LinkvaultConfig, SearchConfig};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        DocumentRef, EdgeKind, GraphEdge, GraphNode, MatchType, OperationMetadata, SearchResult,
    };
    pub use crate::utils::PathValidator;
}
