//! Strict-mode policy.
//!
//! Graph expansion and search only report warnings. Callers that opted into
//! strict behavior run the warnings through [`enforce`], which turns any
//! warning into a hard failure.

use crate::error::{Error, Result};

/// Hint attached to graph strict-mode failures
pub const GRAPH_HINT: &str = "Increase graph limits, reduce depth, or disable --strict.";

/// Hint attached to search strict-mode failures
pub const SEARCH_HINT: &str = "Increase limits or disable --strict when truncation is acceptable.";

/// Fail when `strict` is set and any warning was reported.
pub fn enforce<S: AsRef<str>>(strict: bool, warnings: &[S], hint: &str) -> Result<()> {
    if !strict || warnings.is_empty() {
        return Ok(());
    }
    let details = warnings
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<_>>()
        .join("; ");
    Err(Error::strict_violation(details, hint))
}
