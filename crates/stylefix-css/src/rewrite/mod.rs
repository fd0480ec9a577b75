//! Rewrite the relative `url()` references of a stylesheet into absolute ones.
//!
//! A stylesheet inlined somewhere other than its source path (a `<link>` to a
//! `data:` URI, a `<style>` element on another page) resolves its relative
//! references against the wrong base. [`fix_urls`] anchors every `url()` that
//! appears in a declaration at the document the sheet will be evaluated in.
//!
//! # Example
//!
//! ```
//! use stylefix_common::NoLocation;
//! use stylefix_css::fix_urls;
//!
//! let css = fix_urls(
//!     "a{background:url(images/x.png)}",
//!     Some("http://example.com/path/to/page.html"),
//!     &NoLocation,
//! )
//! .unwrap();
//! assert_eq!(css, r#"a{background:url("http://example.com/path/to/images/x.png")}"#);
//! ```

mod context;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use stylefix_common::{FixUrlsError, LocationProvider, resolve_current};

pub use context::{UrlKind, UrlResolutionContext, unquote};

use crate::parser::{Stylesheet, UrlValue};
use crate::serializer::translate;
use crate::walk::walk_declaration_urls_mut;

/// What to do with the quotes of a `url("...")` that gets rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotePolicy {
    /// Wrap the double-quoted rewrite in the original quote character again,
    /// producing `url('"http://..."')`. This is what existing callers get.
    #[default]
    Legacy,
    /// Keep the original quoting and put the resolved url inside it,
    /// producing `url('http://...')`.
    Preserve,
}

/// Knobs for a rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RewriteOptions {
    /// Quote handling for quoted urls.
    pub quote_policy: QuotePolicy,
}

/// Rewrites stylesheets against one document location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetRewriter {
    context: UrlResolutionContext,
    options: RewriteOptions,
}

impl StylesheetRewriter {
    /// Rewrite against `context` with default options.
    #[must_use]
    pub fn new(context: UrlResolutionContext) -> Self {
        Self::with_options(context, RewriteOptions::default())
    }

    /// Rewrite against `context` with `options`.
    #[must_use]
    pub const fn with_options(context: UrlResolutionContext, options: RewriteOptions) -> Self {
        Self { context, options }
    }

    /// The anchoring context.
    #[must_use]
    pub const fn context(&self) -> &UrlResolutionContext {
        &self.context
    }

    /// Parse, rewrite, and print `css`.
    #[must_use]
    pub fn rewrite(&self, css: &str) -> String {
        let mut stylesheet = Stylesheet::parse(css);
        let rewritten = self.rewrite_stylesheet(&mut stylesheet);
        tracing::trace!(rewritten, "rewrote stylesheet urls");
        translate(&stylesheet)
    }

    /// Rewrite every declaration `url()` of an already parsed stylesheet in
    /// place. Returns how many urls were rewritten.
    pub fn rewrite_stylesheet(&self, stylesheet: &mut Stylesheet) -> usize {
        walk_declaration_urls_mut(stylesheet, |url, _| self.rewrite_url(url))
    }

    /// Rewrite one url node.
    ///
    /// A raw node's text is replaced by the double-quoted rewrite. A quoted
    /// node hands its text (without its delimiters) to the rewriter and keeps
    /// its original quote character around the result; with
    /// [`QuotePolicy::Preserve`] the resolved url goes in without the
    /// rewriter's own quotes.
    pub fn rewrite_url(&self, url: &mut UrlValue) {
        match url {
            UrlValue::Raw(text) => *text = self.context.fix_url(text),
            UrlValue::Quoted { text, .. } => match self.options.quote_policy {
                QuotePolicy::Legacy => *text = self.context.fix_url(text),
                QuotePolicy::Preserve => {
                    let resolved = self.context.resolve(unquote(text));
                    tracing::debug!(from = %text, to = %resolved, "rewrote url");
                    *text = resolved;
                }
            },
        }
    }
}

/// Rewrite every relative `url()` in the declarations of `css` into an
/// absolute url anchored at `current_url`.
///
/// When `current_url` is `None` (or empty) the location comes from
/// `provider`. Empty `css` is returned as is without consulting either.
///
/// # Errors
///
/// Returns [`FixUrlsError::MissingCurrentUrl`] when `css` is not empty and no
/// document url is available.
pub fn fix_urls<'a>(
    css: &'a str,
    current_url: Option<&str>,
    provider: &dyn LocationProvider,
) -> Result<Cow<'a, str>, FixUrlsError> {
    fix_urls_with_options(css, current_url, provider, RewriteOptions::default())
}

/// [`fix_urls`] with explicit [`RewriteOptions`].
///
/// # Errors
///
/// Same as [`fix_urls`].
pub fn fix_urls_with_options<'a>(
    css: &'a str,
    current_url: Option<&str>,
    provider: &dyn LocationProvider,
    options: RewriteOptions,
) -> Result<Cow<'a, str>, FixUrlsError> {
    if css.is_empty() {
        return Ok(Cow::Borrowed(css));
    }

    let location = resolve_current(current_url, provider)?;
    let rewriter = StylesheetRewriter::with_options(UrlResolutionContext::new(location), options);
    Ok(Cow::Owned(rewriter.rewrite(css)))
}

/// [`fix_urls`] for callers whose stylesheet may be absent; `None` passes
/// through untouched.
///
/// # Errors
///
/// Same as [`fix_urls`].
pub fn fix_optional_urls<'a>(
    css: Option<&'a str>,
    current_url: Option<&str>,
    provider: &dyn LocationProvider,
) -> Result<Option<Cow<'a, str>>, FixUrlsError> {
    css.map(|css| fix_urls(css, current_url, provider))
        .transpose()
}
