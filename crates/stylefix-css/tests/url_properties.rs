//! Property tests for url classification and resolution.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use stylefix_css::{UrlKind, UrlResolutionContext, unquote};

const PAGE: &str = "https://example.com/a/b/page.html";

fn context() -> UrlResolutionContext {
    UrlResolutionContext::for_document(PAGE)
}

#[quickcheck]
fn absolute_urls_resolve_to_themselves(rest: String, upper: bool) -> bool {
    let scheme = if upper { "HTTPS://" } else { "https://" };
    let url = format!("{scheme}{rest}");
    let context = context();
    UrlKind::of(&url) == UrlKind::Absolute && context.resolve(&url) == url
}

#[quickcheck]
fn root_relative_urls_take_the_origin(rest: String) -> TestResult {
    if rest.starts_with('/') {
        return TestResult::discard();
    }
    let url = format!("/{rest}");
    TestResult::from_bool(context().resolve(&url) == format!("https://example.com{url}"))
}

#[quickcheck]
fn protocol_relative_urls_take_the_protocol(rest: String) -> bool {
    let url = format!("//{rest}");
    context().resolve(&url) == format!("https:{url}")
}

#[quickcheck]
fn relative_urls_land_in_the_directory(url: String) -> TestResult {
    let context = context();
    if UrlKind::of(&url) != UrlKind::DocumentRelative {
        return TestResult::discard();
    }
    let resolved = context.resolve(&url);
    TestResult::from_bool(
        resolved.starts_with("https://example.com/a/b/")
            && resolved.ends_with(url.strip_prefix("./").unwrap_or(&url)),
    )
}

#[quickcheck]
fn fixed_url_is_a_json_string_of_the_resolution(url: String) -> bool {
    let context = context();
    let fixed = context.fix_url(&url);
    serde_json::from_str::<String>(&fixed).is_ok_and(|decoded| decoded == context.resolve(unquote(&url)))
}

#[quickcheck]
fn unquote_removes_at_most_one_layer(inner: String, double: bool) -> bool {
    let quote = if double { '"' } else { '\'' };
    let wrapped = format!("{quote}{inner}{quote}");
    unquote(&wrapped) == inner
}

#[quickcheck]
fn directory_path_always_ends_in_slash(path: String) -> bool {
    let context = UrlResolutionContext::for_document(&format!("http://example.com/{path}"));
    context.directory_path().starts_with("http://example.com/")
        && context.directory_path().ends_with('/')
        && context.origin() == "http://example.com"
        && context.protocol() == "http"
}
