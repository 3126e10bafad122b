//! Parsing of ripgrep's `--json` line protocol.
//!
//! Each stdout line is one JSON event. Only `match` events produce results;
//! every other event type and every line that fails to parse is skipped.

use crate::query::DEFAULT_CONTEXT_CHARS;
use linkvault_core::{MatchType, PathValidator, SearchResult};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RgEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: RgData,
}

#[derive(Debug, Default, Deserialize)]
struct RgData {
    #[serde(default)]
    path: Option<RgText>,
    #[serde(default)]
    lines: Option<RgText>,
    #[serde(default)]
    line_number: Option<usize>,
    #[serde(default)]
    submatches: Vec<RgSubmatch>,
}

/// ripgrep reports UTF-8 data as `text` and anything else as base64 `bytes`
#[derive(Debug, Default, Deserialize)]
struct RgText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RgSubmatch {
    #[serde(rename = "match")]
    matched: RgText,
    start: usize,
    end: usize,
}

/// Parse one ripgrep JSON line into a result.
///
/// Paths are made relative to `root` with forward slashes. Returns `None`
/// for non-match events, matches without submatches, non-UTF-8 payloads and
/// malformed JSON.
pub fn parse_rg_line(line: &[u8], root: &Path, context_chars: usize) -> Option<SearchResult> {
    let event: RgEvent = match serde_json::from_slice(line) {
        Ok(event) => event,
        Err(e) => {
            log::trace!("Skipping unparseable ripgrep line: {}", e);
            return None;
        }
    };
    if event.kind != "match" {
        return None;
    }
    let data = event.data;
    let submatch = data.submatches.into_iter().next()?;
    let path = data.path?.text?;
    let text = data.lines?.text?;
    let text = text.trim_end_matches(['\n', '\r']);

    Some(SearchResult {
        path: PathValidator::relative_slash_path(root, Path::new(&path)),
        line: data.line_number.unwrap_or(0),
        column: submatch.start + 1,
        match_text: submatch.matched.text.unwrap_or_default(),
        snippet: trim_context(text, submatch.start, submatch.end, context_chars),
        match_type: MatchType::Text,
    })
}

/// Snippet of `line` around the byte span `start..end`.
///
/// Keeps up to `context_chars` characters on each side of the span, clamped
/// to the line. Offsets are converted to character positions first, so the
/// result never splits a character. A context of 0 means the default of 80.
pub fn trim_context(line: &str, start: usize, end: usize, context_chars: usize) -> String {
    let context = if context_chars == 0 {
        DEFAULT_CONTEXT_CHARS
    } else {
        context_chars
    };
    let total = line.chars().count();
    let start_char = char_position(line, start);
    let end_char = char_position(line, end).max(start_char);
    let left = start_char.saturating_sub(context);
    let right = end_char.saturating_add(context).min(total);
    line.chars().skip(left).take(right - left).collect()
}

/// Number of characters that begin before byte offset `byte`.
fn char_position(line: &str, byte: usize) -> usize {
    line.char_indices().take_while(|(i, _)| *i < byte).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCH_LINE: &str = r#"{"type":"match","data":{"path":{"text":"/vault/notes/a.md"},"lines":{"text":"hello world\n"},"line_number":3,"absolute_offset":10,"submatches":[{"match":{"text":"world"},"start":6,"end":11}]}}"#;

    #[test]
    fn test_parse_match_event() {
        let result = parse_rg_line(MATCH_LINE.as_bytes(), Path::new("/vault"), 80).unwrap();
        assert_eq!(result.path, "notes/a.md");
        assert_eq!(result.line, 3);
        assert_eq!(result.column, 7);
        assert_eq!(result.match_text, "world");
        assert_eq!(result.snippet, "hello world");
        assert_eq!(result.match_type, MatchType::Text);
    }

    #[test]
    fn test_other_events_skipped() {
        let root = Path::new("/vault");
        let begin = br#"{"type":"begin","data":{"path":{"text":"/vault/a.md"}}}"#;
        let summary = br#"{"type":"summary","data":{"elapsed_total":{"secs":0,"nanos":1},"stats":{}}}"#;
        assert!(parse_rg_line(begin, root, 80).is_none());
        assert!(parse_rg_line(summary, root, 80).is_none());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let root = Path::new("/vault");
        assert!(parse_rg_line(b"not json at all", root, 80).is_none());
        assert!(parse_rg_line(b"{\"type\":\"match\"", root, 80).is_none());
        assert!(parse_rg_line(b"", root, 80).is_none());
        let no_sub = br#"{"type":"match","data":{"path":{"text":"/vault/a.md"},"lines":{"text":"x"},"line_number":1,"submatches":[]}}"#;
        assert!(parse_rg_line(no_sub, root, 80).is_none());
        let bytes = br#"{"type":"match","data":{"path":{"bytes":"L3ZhdWx0"},"lines":{"text":"x"},"line_number":1,"submatches":[{"match":{"text":"x"},"start":0,"end":1}]}}"#;
        assert!(parse_rg_line(bytes, root, 80).is_none());
    }

    #[test]
    fn test_trim_context_ascii() {
        let line = "0123456789abcdefghij";
        assert_eq!(trim_context(line, 10, 11, 2), "89abc");
        assert_eq!(trim_context(line, 0, 1, 3), "0123");
        assert_eq!(trim_context(line, 19, 20, 5), "efghij");
    }

    #[test]
    fn test_trim_context_counts_characters() {
        // each 'é' is two bytes, so "x" sits at byte 9 but character 5
        let line = "éééé x éééé";
        let start = line.find('x').unwrap();
        assert_eq!(start, 9);
        let snippet = trim_context(line, start, start + 1, 3);
        assert_eq!(snippet, "éé x éé");
        assert_eq!(snippet.chars().count(), 7);
    }

    #[test]
    fn test_trim_context_wide_characters() {
        let line = "日本語のテキストで検索する";
        let start = line.find("検索").unwrap();
        let snippet = trim_context(line, start, start + "検索".len(), 2);
        assert_eq!(snippet, "トで検索する");
    }

    #[test]
    fn test_trim_context_zero_uses_default() {
        let line = "a".repeat(200);
        assert_eq!(trim_context(&line, 100, 101, 0).len(), 161);
    }

    #[test]
    fn test_trim_context_offsets_out_of_range() {
        assert_eq!(trim_context("short", 50, 60, 2), "rt");
        assert_eq!(trim_context("short", 3, 60, 1), "ort");
    }
}
