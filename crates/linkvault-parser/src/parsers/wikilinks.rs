//! Wikilink parser: `[[Note]]`, `[[folder/Note]]`, `[[Note#Heading]]`, `[[Note|Alias]]`
//!
//! Only link targets are extracted. Aliases and anchors are dropped and the
//! remaining target is normalized into a link key, so every spelling of a
//! reference to the same note collapses to one entry.

use super::link_utils::normalize_link_target;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Matches [[...]] pattern
static WIKILINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("valid wikilink pattern"));

/// Extract the normalized, deduplicated, sorted link keys of a note body.
///
/// Embeds (`![[Note]]`) count as links. Malformed syntax simply does not
/// match; this never fails.
///
/// # Example
/// ```
/// use linkvault_parser::parse_wikilinks;
///
/// let links = parse_wikilinks("See [[Note]], [[note|alias]] and [[Note#Heading]]");
/// assert_eq!(links, vec!["note".to_string()]);
/// ```
pub fn parse_wikilinks(content: &str) -> Vec<String> {
    let targets: BTreeSet<String> = WIKILINK_PATTERN
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .filter_map(|inner| {
            let inner = inner.as_str().trim();
            let target = inner.split('|').next().unwrap_or(inner).trim();
            let target = target.split('#').next().unwrap_or(target);
            let key = normalize_link_target(target);
            (!key.is_empty()).then_some(key)
        })
        .collect();
    targets.into_iter().collect()
}
