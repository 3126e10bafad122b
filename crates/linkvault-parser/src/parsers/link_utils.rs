//! Shared utilities for turning link targets into lookup keys.
//!
//! Both the wikilink parser and the backlink index resolve references
//! through [`normalize_link_target`], so the two always agree on what a
//! target means.

use linkvault_core::clean_slash_path;

/// Normalize a raw wikilink target into a link key.
///
/// Trims whitespace, strips a leading `./` and a trailing `.md`, cleans the
/// path lexically, strips one leading `../` and any leading `/`, then
/// lowercases. An empty target stays empty. Never fails.
///
/// # Examples
///
/// ```
/// use linkvault_parser::normalize_link_target;
///
/// assert_eq!(normalize_link_target("./Folder/Note.md"), "folder/note");
/// assert_eq!(normalize_link_target("../Shared"), "shared");
/// assert_eq!(normalize_link_target("a//b/../c"), "a/c");
/// assert_eq!(normalize_link_target("   "), "");
/// ```
pub fn normalize_link_target(target: &str) -> String {
    let trimmed = target.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut value = trimmed.replace('\\', "/");
    if let Some(rest) = value.strip_prefix("./") {
        value = rest.to_string();
    }
    if let Some(rest) = value.strip_suffix(".md") {
        value = rest.to_string();
    }
    let cleaned = clean_slash_path(&value);
    let cleaned = cleaned.strip_prefix("../").unwrap_or(&cleaned);
    let cleaned = cleaned.trim_start_matches('/');
    if cleaned == "." {
        return String::new();
    }
    cleaned.to_lowercase()
}
