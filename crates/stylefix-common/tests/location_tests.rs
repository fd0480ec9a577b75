//! Integration tests for document location resolution and providers.

use stylefix_common::warning::{clear_warnings, warn_once, was_warned};
use stylefix_common::{
    DocumentLocation, EnvLocation, FixUrlsError, FixedLocation, LocationProvider, NoLocation,
    resolve_current,
};

fn triple(url: &str) -> (String, String, String) {
    let DocumentLocation {
        protocol,
        origin,
        directory_path,
    } = DocumentLocation::resolve(url);
    (protocol, origin, directory_path)
}

#[test]
fn test_resolve_page_in_subdirectory() {
    assert_eq!(
        triple("http://example.com/path/to/page.html"),
        (
            "http".to_string(),
            "http://example.com".to_string(),
            "http://example.com/path/to/".to_string()
        )
    );
}

#[test]
fn test_resolve_keeps_port_in_origin() {
    let location = DocumentLocation::resolve("https://example.com:8443/app/index.html");
    assert_eq!(location.protocol, "https");
    assert_eq!(location.origin, "https://example.com:8443");
    assert_eq!(location.directory_path, "https://example.com:8443/app/");
}

#[test]
fn test_resolve_trailing_slash_is_its_own_directory() {
    let location = DocumentLocation::resolve("http://example.com/a/");
    assert_eq!(location.directory_path, "http://example.com/a/");
}

#[test]
fn test_resolve_origin_only() {
    let location = DocumentLocation::resolve("http://example.com");
    assert_eq!(location.origin, "http://example.com");
    assert_eq!(location.directory_path, "http://example.com/");
}

#[test]
fn test_resolve_query_with_slash_counts_as_path() {
    // The file name is everything after the final `/`, query included.
    let location = DocumentLocation::resolve("http://example.com/app/page?next=/a/b");
    assert_eq!(location.directory_path, "http://example.com/app/page?next=/a/");
}

#[test]
fn test_resolve_file_url() {
    let location = DocumentLocation::resolve("file:///C:/site/index.html");
    assert_eq!(location.protocol, "file");
    assert_eq!(location.origin, "file:");
    assert_eq!(location.directory_path, "file:///C:/site/");
}

#[test]
fn test_resolve_protocol_relative_document() {
    let location = DocumentLocation::resolve("//cdn.example.com/css/site.css");
    assert_eq!(location.protocol, "");
    assert_eq!(location.origin, "//cdn.example.com");
    assert_eq!(location.directory_path, "//cdn.example.com/css/");
}

#[test]
fn test_resolve_protocol_relative_document_with_port() {
    let location = DocumentLocation::resolve("//cdn.example.com:8080/x.html");
    assert_eq!(location.protocol, "");
    assert_eq!(location.origin, "//cdn.example.com:8080");
    assert_eq!(location.directory_path, "//cdn.example.com:8080/");
}

#[test]
fn test_resolve_keeps_empty_path_segments() {
    let location = DocumentLocation::resolve("http://example.com/a//b.html");
    assert_eq!(location.directory_path, "http://example.com/a//");
}

#[test]
fn test_resolve_uppercase_scheme_is_not_a_scheme() {
    // Only lowercase schemes match; the rest is treated as a bare host.
    let location = DocumentLocation::resolve("HTTP://example.com/a/b.html");
    assert_eq!(location.origin, "HTTP:");
    assert_eq!(location.protocol, "HTTP");
}

#[test]
fn test_resolve_path_without_origin_is_degenerate() {
    let location = DocumentLocation::resolve("/just/a/page.html");
    assert_eq!(location.protocol, "");
    assert_eq!(location.origin, "");
    assert_eq!(location.directory_path, "/just/a/");
}

#[test]
fn test_origin_never_ends_with_slash() {
    for url in [
        "http://example.com/",
        "https://a.b/c/d",
        "//x/y",
        "file:///tmp/a.css",
        "ftp://host",
    ] {
        let location = DocumentLocation::resolve(url);
        assert!(!location.origin.ends_with('/'), "{url}");
        assert!(location.directory_path.ends_with('/'), "{url}");
    }
}

#[test]
fn test_explicit_url_wins_over_provider() {
    let provider = FixedLocation("http://ambient.test/x/y.html".to_string());
    let location = resolve_current(Some("https://explicit.test/a/b.html"), &provider).unwrap();
    assert_eq!(location.origin, "https://explicit.test");
}

#[test]
fn test_empty_url_falls_back_to_provider() {
    let provider = FixedLocation("http://ambient.test/x/y.html".to_string());
    let location = resolve_current(Some(""), &provider).unwrap();
    assert_eq!(location.directory_path, "http://ambient.test/x/");
}

#[test]
fn test_missing_url_without_provider_is_an_error() {
    assert_eq!(
        resolve_current(None, &NoLocation),
        Err(FixUrlsError::MissingCurrentUrl)
    );
}

#[test]
fn test_provider_reporting_empty_url_is_an_error() {
    let provider = FixedLocation(String::new());
    assert_eq!(
        resolve_current(None, &provider),
        Err(FixUrlsError::MissingCurrentUrl)
    );
}

#[test]
fn test_env_location_reads_missing_variable_as_none() {
    let provider = EnvLocation::new("STYLEFIX_TEST_VARIABLE_THAT_IS_NEVER_SET");
    assert_eq!(provider.current_location(), None);
}

#[test]
fn test_error_message() {
    assert_eq!(
        FixUrlsError::MissingCurrentUrl.to_string(),
        "invalid input: a current url is required"
    );
}

#[test]
fn test_warn_once_records_message() {
    clear_warnings();
    warn_once("location-tests", "something odd");
    warn_once("location-tests", "something odd");
    assert!(was_warned("location-tests", "something odd"));
    assert!(!was_warned("location-tests", "something else"));
}
