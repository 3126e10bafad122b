//! Tag parser: #tag, #parent/child, plus frontmatter `tags`

use super::frontmatter_parser::get_property;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Matches #tag or #parent/child at the start of input or after whitespace
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)#([A-Za-z0-9_\-/]+)").expect("valid tag pattern")
});

/// Lowercase a tag and strip a leading `#`.
pub fn normalize_tag(tag: &str) -> String {
    tag.strip_prefix('#')
        .unwrap_or(tag)
        .trim()
        .to_lowercase()
}

/// Inline tags of a body, normalized, deduplicated and sorted.
///
/// # Example
/// ```
/// use linkvault_parser::parse_tags;
///
/// assert_eq!(parse_tags("#Rust and #rust, not a#tag"), vec!["rust".to_string()]);
/// ```
pub fn parse_tags(content: &str) -> Vec<String> {
    let tags: BTreeSet<String> = TAG_PATTERN
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| normalize_tag(m.as_str()))
        .filter(|tag| !tag.is_empty())
        .collect();
    tags.into_iter().collect()
}

/// Tags declared in frontmatter, as a list or a single string.
pub fn frontmatter_tags(frontmatter: &Mapping) -> Vec<String> {
    let Some(value) = get_property(frontmatter, "tags") else {
        return Vec::new();
    };
    let raw: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Sequence(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(normalize_tag)
        .filter(|tag| !tag.is_empty())
        .collect()
}
