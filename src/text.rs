//! Multi-needle string predicates.
//!
//! Each check takes a list of needles and succeeds if any of them matches.
//! Empty needles never match, so an empty string in a config list can't turn
//! a prefix check into "always true".

use url::Url;

/// Whether `haystack` starts with any non-empty needle.
pub fn starts_with_any<S: AsRef<str>>(haystack: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| {
        let n: &str = n.as_ref();
        !n.is_empty() && haystack.starts_with(n)
    })
}

/// Whether `haystack` ends with any non-empty needle.
pub fn ends_with_any<S: AsRef<str>>(haystack: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| {
        let n: &str = n.as_ref();
        !n.is_empty() && haystack.ends_with(n)
    })
}

/// Whether `haystack` contains any non-empty needle.
pub fn contains_any<S: AsRef<str>>(haystack: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| {
        let n: &str = n.as_ref();
        !n.is_empty() && haystack.contains(n)
    })
}

/// Whether `s` is an absolute URL with a host (`https://example.com/x`).
///
/// Relative paths and host-less URIs such as `mailto:` are rejected.
pub fn is_url(s: &str) -> bool {
    Url::parse(s).is_ok_and(|url| url.has_host())
}
