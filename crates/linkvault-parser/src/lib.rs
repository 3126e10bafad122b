//! # linkvault Parser
//!
//! Extracts the pieces of a markdown note that the link graph and search
//! layers need.
//!
//! This crate provides:
//! - Wikilink extraction with alias and anchor stripping
//! - Link target normalization shared with the backlink index
//! - YAML frontmatter splitting via `serde_yaml`
//! - Inline and frontmatter tag extraction
//!
//! ## Quick Start
//!
//! ```
//! use linkvault_parser::{parse_wikilinks, split_frontmatter, parse_tags};
//!
//! let content = "---\ntitle: My Note\ntags: [review]\n---\n\n[[Other Note#Heading]] and [[other note|alias]] #draft\n";
//!
//! let doc = split_frontmatter(content).unwrap();
//! assert!(doc.has_frontmatter);
//! assert_eq!(parse_wikilinks(&doc.body), vec!["other note".to_string()]);
//! assert_eq!(parse_tags(&doc.body), vec!["draft".to_string()]);
//! ```
//!
//! ## Performance
//!
//! Patterns are compiled once through `std::sync::LazyLock`.

pub mod parsers;

pub use parsers::{
    SplitDocument, frontmatter_tags, get_property, normalize_link_target, normalize_tag,
    parse_tags, parse_wikilinks, split_frontmatter, value_to_string,
};
