//! CSS tokenizer, parser, printer, and `url()` rewriting for stylefix.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Comment handling
//!   - Escape sequences
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheet parsing
//!   - Rule parsing (style rules and at-rules, nested rule lists)
//!   - Declaration parsing
//!
//! - **Printer** ([CSSOM § 2.1](https://drafts.csswg.org/cssom/#common-serializing-idioms))
//!   - Compact output with identifiers and strings re-escaped
//!
//! - **Url rewriting**
//!   - Every `url()` inside a declaration is resolved against the document
//!     the stylesheet is used in; `@import` preludes are left alone
//!
//! # Not Yet Implemented
//!
//! - Source maps
//! - Preserving comments and original whitespace

/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Declaration `url()` rewriting.
pub mod rewrite;
/// Stylesheet printer per [CSSOM § 2.1](https://drafts.csswg.org/cssom/#common-serializing-idioms).
pub mod serializer;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Mutable stylesheet traversal.
pub mod walk;

pub use parser::{
    AtRule, AtRuleBlock, CSSParser, ComponentValue, Declaration, Rule, StyleRule, Stylesheet,
    UrlValue,
};
pub use rewrite::{
    QuotePolicy, RewriteOptions, StylesheetRewriter, UrlKind, UrlResolutionContext, fix_optional_urls,
    fix_urls, fix_urls_with_options, unquote,
};
pub use serializer::{translate, translate_declaration};
pub use stylefix_common::FixUrlsError;
pub use tokenizer::{CSSToken, CSSTokenizer, tokenize};
pub use walk::{WalkContext, walk_declaration_urls_mut, walk_mut};
