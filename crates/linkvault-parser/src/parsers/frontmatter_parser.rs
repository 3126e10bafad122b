//! Frontmatter extraction: ---\nYAML\n---

use linkvault_core::{Error, Result};
use serde_yaml::{Mapping, Value};

/// A note split into its YAML header and markdown body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitDocument {
    pub frontmatter: Mapping,
    pub body: String,
    /// True when a complete `---` fenced header was found
    pub has_frontmatter: bool,
}

/// Split raw note content into frontmatter and body.
///
/// Line endings are normalized to `\n`. The header must open with a `---`
/// line and close with a line that is exactly `---`; without both the whole
/// content is the body. A single blank line after the closing fence is
/// dropped from the body.
///
/// # Errors
/// Returns a parse error when the fenced header is not a YAML mapping.
pub fn split_frontmatter(raw: &str) -> Result<SplitDocument> {
    let normalized = raw.replace("\r\n", "\n");
    let Some(rest) = normalized.strip_prefix("---\n") else {
        return Ok(unfenced(normalized));
    };

    let mut yaml_end = None;
    let mut offset = 0;
    for line in rest.split('\n') {
        if line == "---" {
            yaml_end = Some(offset);
            break;
        }
        offset += line.len() + 1;
    }
    let Some(yaml_end) = yaml_end else {
        return Ok(unfenced(normalized));
    };

    let yaml = rest[..yaml_end].trim_end_matches('\n');
    let after = rest.get(yaml_end + 4..).unwrap_or("");
    let body = after.strip_prefix('\n').unwrap_or(after).to_string();

    let frontmatter = if yaml.trim().is_empty() {
        Mapping::new()
    } else {
        match serde_yaml::from_str::<Value>(yaml) {
            Ok(Value::Mapping(map)) => map,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => return Err(Error::parse_error("frontmatter must be a YAML mapping")),
            Err(e) => return Err(Error::parse_error(format!("invalid frontmatter: {}", e))),
        }
    };

    Ok(SplitDocument {
        frontmatter,
        body,
        has_frontmatter: true,
    })
}

fn unfenced(body: String) -> SplitDocument {
    SplitDocument {
        frontmatter: Mapping::new(),
        body,
        has_frontmatter: false,
    }
}

/// Render a frontmatter value the way property filters compare it.
///
/// Scalars print bare, sequences join their items with `, `, and nested
/// mappings fall back to flow YAML.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
        Value::Tagged(tagged) => value_to_string(&tagged.value),
    }
}

/// Look up a top-level frontmatter key.
pub fn get_property<'a>(frontmatter: &'a Mapping, key: &str) -> Option<&'a Value> {
    frontmatter.get(Value::String(key.to_string()))
}
