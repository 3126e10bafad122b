//! Note content parsers: wikilinks, frontmatter and tags

pub mod frontmatter_parser;
pub mod link_utils;
pub mod tags;
pub mod wikilinks;

pub use self::frontmatter_parser::{SplitDocument, get_property, split_frontmatter, value_to_string};
pub use self::link_utils::normalize_link_target;
pub use self::tags::{frontmatter_tags, normalize_tag, parse_tags};
pub use self::wikilinks::parse_wikilinks;
