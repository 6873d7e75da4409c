//! errors.rs - Custom error types for the chromashift-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `chromashift-core` library.
///
/// Marked `#[non_exhaustive]`: new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChromaError {
    #[error("Failed to compile coloring rule #{0} ('{1}'): {2}")]
    RuleCompilationError(usize, String, regex::Error),

    #[error("Span {start}..{end} does not fit a {len}-byte unit on character boundaries")]
    InvalidSpan { start: usize, end: usize, len: usize },

    #[error("No rules file named '{0}' could be loaded")]
    RulesNotFound(String),

    #[error("No configured command matches '{0}'")]
    NoMatchingCommand(String),
}
