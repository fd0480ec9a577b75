//! Errors surfaced by the stylesheet transformer.

use thiserror::Error;

/// Error type for url rewriting.
///
/// Malformed CSS is never an error: the tokenizer and parser recover the way
/// CSS Syntax Level 3 prescribes. The only way a rewrite can fail is invalid
/// input, which is detected before any node is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixUrlsError {
    /// No document URL was passed and the location provider had none either.
    #[error("invalid input: a current url is required")]
    MissingCurrentUrl,
}
