//! Rendering of command results and errors.

use linkvault_core::{Error, Result, to_json_string};
use serde::Serialize;
use serde_json::Value;

/// What a command produced: structured data for `--json` and text lines
/// for the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub data: Value,
    pub lines: Vec<String>,
}

impl CommandOutput {
    pub fn new(data: Value, lines: Vec<String>) -> Self {
        Self { data, lines }
    }
}

/// JSON envelope wrapping every `--json` response
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: i32,
    pub reason: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_hint: Option<String>,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            code: err.exit_code(),
            reason: err.reason(),
            message: err.to_string(),
            actionable_hint: err.hint().map(str::to_string),
        }
    }
}

/// Render a successful result for stdout
pub fn render_success(output: &CommandOutput, json: bool) -> Result<String> {
    if json {
        let envelope = Envelope {
            ok: true,
            data: Some(&output.data),
            error: None,
        };
        return to_json_string(&envelope, "response");
    }
    Ok(output.lines.join("\n"))
}

/// Render a failure for stderr
pub fn render_error(err: &Error, json: bool) -> String {
    if json {
        let envelope = Envelope {
            ok: false,
            data: None,
            error: Some(ErrorBody::from(err)),
        };
        if let Ok(text) = to_json_string(&envelope, "error") {
            return text;
        }
    }
    match err.hint() {
        Some(hint) => format!("error: {}\nhint: {}", err, hint),
        None => format!("error: {}", err),
    }
}
