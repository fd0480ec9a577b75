//! Document location resolution.
//!
//! [RFC 3986 § 3 Syntax Components](https://www.rfc-editor.org/rfc/rfc3986#section-3)
//!
//! A stylesheet that gets embedded somewhere other than its source path needs
//! an anchor for its relative references. This module derives that anchor (a
//! protocol, an origin, and a directory path) from the absolute URL of the
//! document the stylesheet will be evaluated in.
//!
//! The resolver is lenient on purpose: it never rejects a URL. Malformed input
//! yields a best-effort, possibly degenerate, triple.

use std::env;

use crate::error::FixUrlsError;

/// Environment variable read by [`EnvLocation::default`].
pub const CURRENT_URL_ENV: &str = "STYLEFIX_CURRENT_URL";

/// The anchoring triple derived from a document URL.
///
/// Invariants: `origin` never ends with `/`, and `directory_path` always ends
/// with `/`. Empty path segments are kept, so `http://h/a//b.html` anchors at
/// `http://h/a//`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    /// Scheme without the trailing `:` (e.g. `http`). Empty when the URL has
    /// no scheme.
    pub protocol: String,
    /// Scheme, `//`, and authority (e.g. `http://example.com:8080`).
    pub origin: String,
    /// `origin` plus the directory part of the path, ending in `/`.
    pub directory_path: String,
}

impl DocumentLocation {
    /// Derive the anchoring triple from an absolute document URL.
    ///
    /// # Algorithm
    ///
    /// STEP 1: Match the origin: an optional lowercase `scheme:`, an optional
    ///         `//`, then one or more code points that are not `/`.
    ///
    /// STEP 2: A scheme-relative origin (`//host`) has no protocol, even when
    ///         a port follows the host. Otherwise the protocol is whatever
    ///         precedes the first `:` of the origin, or nothing without one.
    ///
    /// STEP 3: Strip the origin from the URL, then drop everything from the
    ///         final `/` onward (the file name).
    ///
    /// STEP 4: The directory path is origin + what is left + `/`.
    #[must_use]
    pub fn resolve(document_url: &str) -> Self {
        // STEP 1
        let origin = match_origin(document_url).unwrap_or_default();

        // STEP 2
        let protocol = if origin.starts_with("//") {
            ""
        } else {
            origin.split_once(':').map_or("", |(scheme, _)| scheme)
        }
        .to_string();

        // STEP 3
        let path = &document_url[origin.len()..];
        let directory = path.rfind('/').map_or("", |slash| &path[..slash]);

        // STEP 4
        let directory_path = format!("{origin}{directory}/");

        Self {
            protocol,
            origin: origin.to_string(),
            directory_path,
        }
    }
}

/// Match `^([a-z]+:)?(//)?[^/]+` against `url`.
///
/// Alternatives are tried in the same order a backtracking regex engine would:
/// with scheme and slashes, scheme only, slashes only, neither.
fn match_origin(url: &str) -> Option<&str> {
    let scheme_len = scheme_prefix_len(url);

    let candidates = [
        scheme_len.filter(|&len| url[len..].starts_with("//")).map(|len| len + 2),
        scheme_len,
        url.starts_with("//").then_some(2),
        Some(0),
    ];

    candidates.into_iter().flatten().find_map(|host_start| {
        let host_len = url[host_start..].find('/').unwrap_or(url.len() - host_start);
        (host_len > 0).then_some(&url[..host_start + host_len])
    })
}

/// Length of a leading `[a-z]+:` run, colon included.
fn scheme_prefix_len(url: &str) -> Option<usize> {
    let letters = url.bytes().take_while(u8::is_ascii_lowercase).count();
    (letters > 0 && url.as_bytes().get(letters) == Some(&b':')).then_some(letters + 1)
}

/// Source of the ambient "current page location" used when a caller does not
/// pass a document URL.
///
/// Hosts that have a notion of the current page (an embedding browser shell,
/// a bundler that knows its public path, an environment variable) implement
/// this and hand it to the transformer explicitly.
pub trait LocationProvider {
    /// The current document URL, if the host knows it.
    fn current_location(&self) -> Option<String>;
}

/// A provider for hosts without an ambient location.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_location(&self) -> Option<String> {
        None
    }
}

/// A provider that always reports the same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocation(pub String);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A provider that reads the location from an environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLocation {
    /// Name of the variable to read.
    pub variable: String,
}

impl EnvLocation {
    /// Read the location from `variable`.
    #[must_use]
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl Default for EnvLocation {
    fn default() -> Self {
        Self::new(CURRENT_URL_ENV)
    }
}

impl LocationProvider for EnvLocation {
    fn current_location(&self) -> Option<String> {
        env::var(&self.variable).ok()
    }
}

/// Pick the document URL to anchor against and resolve it.
///
/// An explicit, non-empty `current_url` wins. Otherwise the provider is
/// consulted. Empty strings count as absent.
///
/// # Errors
///
/// Returns [`FixUrlsError::MissingCurrentUrl`] when neither source yields a URL.
pub fn resolve_current(
    current_url: Option<&str>,
    provider: &dyn LocationProvider,
) -> Result<DocumentLocation, FixUrlsError> {
    if let Some(url) = current_url.filter(|url| !url.is_empty()) {
        return Ok(DocumentLocation::resolve(url));
    }

    let ambient = provider
        .current_location()
        .filter(|url| !url.is_empty())
        .ok_or(FixUrlsError::MissingCurrentUrl)?;
    tracing::debug!(url = %ambient, "using ambient document location");
    Ok(DocumentLocation::resolve(&ambient))
}
