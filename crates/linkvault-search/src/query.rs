//! Search query construction and validation.

use linkvault_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default result limit when the caller passes a non-positive value
pub const DEFAULT_LIMIT: usize = 20;

/// Default snippet context, in characters on each side of a match
pub const DEFAULT_CONTEXT_CHARS: usize = 80;

/// What a query matches on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueryKind {
    /// Substring or pattern in note text
    Text { text: String },
    /// Inline or frontmatter tag, without the leading `#`
    Tag { tag: String },
    /// Frontmatter property equality
    Prop { key: String, value: String },
}

/// A validated search request.
///
/// Only [`SearchQuery::build`] creates one, so every instance holds exactly
/// one query mode and resolved defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(flatten)]
    kind: QueryKind,
    limit: usize,
    context_chars: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_prefix: Option<String>,
    case_sensitive: bool,
}

impl SearchQuery {
    /// Validate inputs into a query.
    ///
    /// Exactly one of `text`, `tag` and `prop` must be non-blank. A
    /// non-positive `limit` becomes 20 and a negative `context` becomes 80.
    /// A leading `#` on `tag` is stripped; `prop` must be `key=value`.
    pub fn build(
        text: &str,
        tag: &str,
        prop: &str,
        limit: i64,
        context: i64,
        path_prefix: &str,
        case_sensitive: bool,
    ) -> Result<Self> {
        let has_text = !text.trim().is_empty();
        let has_tag = !tag.trim().is_empty();
        let has_prop = !prop.trim().is_empty();
        if [has_text, has_tag, has_prop].iter().filter(|&&set| set).count() != 1 {
            return Err(Error::validation_error(
                "provide exactly one of query text, --tag, or --prop",
            ));
        }

        let kind = if has_text {
            QueryKind::Text {
                text: text.to_string(),
            }
        } else if has_tag {
            let tag = tag.trim();
            QueryKind::Tag {
                tag: tag.strip_prefix('#').unwrap_or(tag).to_string(),
            }
        } else {
            let (key, value) = parse_prop_filter(prop)?;
            QueryKind::Prop { key, value }
        };

        let path_prefix = path_prefix.trim();
        Ok(Self {
            kind,
            limit: usize::try_from(limit)
                .ok()
                .filter(|&l| l > 0)
                .unwrap_or(DEFAULT_LIMIT),
            context_chars: usize::try_from(context).unwrap_or(DEFAULT_CONTEXT_CHARS),
            path_prefix: (!path_prefix.is_empty()).then(|| path_prefix.to_string()),
            case_sensitive,
        })
    }

    /// Text query shorthand with default limits
    pub fn text(text: &str) -> Result<Self> {
        Self::build(text, "", "", 0, -1, "", false)
    }

    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    /// Search text, only for text queries
    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            QueryKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn context_chars(&self) -> usize {
        self.context_chars
    }

    pub fn path_prefix(&self) -> Option<&str> {
        self.path_prefix.as_deref()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            QueryKind::Text { text } => f.write_str(text),
            QueryKind::Tag { tag } => write!(f, "#{}", tag),
            QueryKind::Prop { key, value } => write!(f, "{}={}", key, value),
        }
    }
}

/// Split a `key=value` property filter on its first `=`.
pub fn parse_prop_filter(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.trim().split_once('=') else {
        return Err(Error::validation_error("property filter must be key=value"));
    };
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() {
        return Err(Error::validation_error("property key is required"));
    }
    if value.is_empty() {
        return Err(Error::validation_error("property value is required"));
    }
    Ok((key.to_string(), value.to_string()))
}
