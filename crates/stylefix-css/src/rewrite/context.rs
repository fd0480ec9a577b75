//! Classification and rewriting of a single url reference.

use strum_macros::Display;
use stylefix_common::DocumentLocation;

/// Prefixes that mark a url as already absolute (compared case-insensitively).
const ABSOLUTE_PREFIXES: [&str; 4] = ["data:", "http://", "https://", "file:///"];

/// How a url relates to the document it is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum UrlKind {
    /// `data:`, `http://`, `https://`, or `file:///`; left alone.
    Absolute,
    /// `//host/path`; takes the document's protocol.
    ProtocolRelative,
    /// `/path`; takes the document's origin.
    RootRelative,
    /// Anything else; resolved against the document's directory.
    DocumentRelative,
}

impl UrlKind {
    /// Classify an (unquoted) url.
    #[must_use]
    pub fn of(url: &str) -> Self {
        if ABSOLUTE_PREFIXES
            .iter()
            .any(|prefix| starts_with_ignore_ascii_case(url, prefix))
        {
            Self::Absolute
        } else if url.starts_with("//") {
            Self::ProtocolRelative
        } else if url.starts_with('/') {
            Self::RootRelative
        } else {
            Self::DocumentRelative
        }
    }
}

/// The anchoring triple for one rewrite pass.
///
/// Built once per stylesheet and shared by every url in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolutionContext {
    protocol: String,
    origin: String,
    directory_path: String,
}

impl UrlResolutionContext {
    /// Anchor at `location`.
    #[must_use]
    pub fn new(location: DocumentLocation) -> Self {
        let DocumentLocation {
            protocol,
            origin,
            directory_path,
        } = location;
        Self {
            protocol,
            origin,
            directory_path,
        }
    }

    /// Anchor at the document `url`.
    #[must_use]
    pub fn for_document(url: &str) -> Self {
        Self::new(DocumentLocation::resolve(url))
    }

    /// The protocol protocol-relative urls inherit.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The origin root-relative urls are joined to.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The directory document-relative urls are joined to.
    #[must_use]
    pub fn directory_path(&self) -> &str {
        &self.directory_path
    }

    /// Make an (unquoted) url absolute.
    #[must_use]
    pub fn resolve(&self, url: &str) -> String {
        self.resolve_as(UrlKind::of(url), url)
    }

    fn resolve_as(&self, kind: UrlKind, url: &str) -> String {
        match kind {
            UrlKind::Absolute => url.to_string(),
            UrlKind::ProtocolRelative => format!("{}:{url}", self.protocol),
            UrlKind::RootRelative => format!("{}{url}", self.origin),
            UrlKind::DocumentRelative => {
                let relative = url.strip_prefix("./").unwrap_or(url);
                format!("{}{relative}", self.directory_path)
            }
        }
    }

    /// Rewrite one url as found in a stylesheet.
    ///
    /// STEP 1: Remove one pair of matching double quotes, or failing that one
    ///         pair of matching single quotes.
    ///
    /// STEP 2: Resolve the url against this context.
    ///
    /// STEP 3: Return it as a double-quoted JSON string literal.
    #[must_use]
    pub fn fix_url(&self, url: &str) -> String {
        let url = unquote(url);
        let kind = UrlKind::of(url);
        let resolved = self.resolve_as(kind, url);
        tracing::debug!(from = url, to = %resolved, %kind, "rewrote url");
        json_quote(&resolved)
    }
}

/// Strip one layer of matching quotes, double quotes first.
#[must_use]
pub fn unquote(url: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            url.strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(url)
}

fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Encode `s` as a JSON string literal.
pub(crate) fn json_quote(s: &str) -> String {
    // Serializing a `str` cannot fail.
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_strips_one_layer() {
        assert_eq!(unquote("\"a.png\""), "a.png");
        assert_eq!(unquote("'a.png'"), "a.png");
        assert_eq!(unquote("\"'a.png'\""), "'a.png'");
        assert_eq!(unquote("'\"a.png\"'"), "\"a.png\"");
    }

    #[test]
    fn test_unquote_needs_matching_ends() {
        assert_eq!(unquote("\"a.png'"), "\"a.png'");
        assert_eq!(unquote("\"a.png"), "\"a.png");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote(""), "");
    }

    #[test]
    fn test_starts_with_ignore_ascii_case_on_char_boundary() {
        assert!(starts_with_ignore_ascii_case("HTTPS://x", "https://"));
        assert!(!starts_with_ignore_ascii_case("é", "data:"));
        assert!(!starts_with_ignore_ascii_case("htt", "http://"));
    }

    #[test]
    fn test_empty_url_is_the_directory() {
        let context = UrlResolutionContext::for_document("http://example.com/a/b.html");
        assert_eq!(UrlKind::of(""), UrlKind::DocumentRelative);
        assert_eq!(context.fix_url(""), r#""http://example.com/a/""#);
        assert_eq!(context.fix_url("''"), r#""http://example.com/a/""#);
    }

    #[test]
    fn test_url_kind_display() {
        assert_eq!(UrlKind::ProtocolRelative.to_string(), "protocol-relative");
        assert_eq!(UrlKind::Absolute.to_string(), "absolute");
    }

    #[test]
    fn test_json_quote_escapes() {
        assert_eq!(json_quote("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(json_quote("line\nbreak"), r#""line\nbreak""#);
    }
}
