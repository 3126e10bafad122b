//! Error types for linkvault.
//!
//! All errors in the workspace are represented by the [`Error`] enum.
//! This keeps error handling composable across crates and gives the CLI a
//! single place to map failures onto exit codes.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Process exit codes shared by every command.
pub mod exit {
    pub const GENERIC: i32 = 1;
    pub const VALIDATION: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const CONFIG: i32 = 4;
}

/// The core error type for all linkvault operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Document not found
    #[error("note not found: {path}")]
    NotFound { path: String },

    /// Invalid document or search path
    #[error("invalid path: {reason}")]
    InvalidPath { reason: String },

    /// Path resolves outside the vault root
    #[error("path escapes vault root: {path}")]
    PathTraversal { path: PathBuf },

    /// Parse error (frontmatter, structured tool output)
    #[error("parse error: {reason}")]
    ParseError { reason: String },

    /// Invalid configuration
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Validation error (malformed query, bad flag values)
    #[error("validation error: {reason}")]
    ValidationError { reason: String },

    /// External tool is not installed or cannot be spawned
    #[error("{tool} is not available on this host")]
    ToolUnavailable { tool: String },

    /// External tool ran and failed
    #[error("{tool} search failed: {message}")]
    Execution { tool: String, message: String },

    /// Operation cancelled by the caller's deadline
    #[error("operation cancelled")]
    Cancelled,

    /// Warnings were reported while strict mode was requested
    #[error("strict mode violation: {details}")]
    StrictModeViolation { details: String, hint: String },

    /// Generic unclassified error
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Create a path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Error::PathTraversal { path: path.into() }
    }

    /// Create a parse error
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Error::ParseError {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation_error(reason: impl Into<String>) -> Self {
        Error::ValidationError {
            reason: reason.into(),
        }
    }

    /// Create a tool unavailable error
    pub fn tool_unavailable(tool: impl Into<String>) -> Self {
        Error::ToolUnavailable { tool: tool.into() }
    }

    /// Create an execution failure carrying the tool's diagnostic text
    pub fn execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Execution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a strict mode violation
    pub fn strict_violation(details: impl Into<String>, hint: impl Into<String>) -> Self {
        Error::StrictModeViolation {
            details: details.into(),
            hint: hint.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// True for errors that mean "the document is not there".
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ValidationError { .. }
            | Error::InvalidPath { .. }
            | Error::PathTraversal { .. }
            | Error::StrictModeViolation { .. } => exit::VALIDATION,
            Error::NotFound { .. } => exit::NOT_FOUND,
            Error::ConfigError { .. } => exit::CONFIG,
            _ => exit::GENERIC,
        }
    }

    /// Machine-readable reason used in JSON error envelopes.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::Io(_) => "io_error",
            Error::NotFound { .. } => "not_found",
            Error::InvalidPath { .. } | Error::PathTraversal { .. } => "invalid_path",
            Error::ParseError { .. } => "parse_error",
            Error::ConfigError { .. } => "config_error",
            Error::ValidationError { .. } => "validation_error",
            Error::ToolUnavailable { .. } => "tool_unavailable",
            Error::Execution { .. } => "execution_failed",
            Error::Cancelled => "cancelled",
            Error::StrictModeViolation { .. } => "strict_mode_violation",
            Error::Other(_) => "error",
        }
    }

    /// Actionable hint, when the error carries one.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Error::StrictModeViolation { hint, .. } => Some(hint),
            _ => None,
        }
    }
}
