//! URL validators

use std::borrow::Cow;
use url::{Host, Url};

/// Schemes accepted by [`is_url`]
pub const ALLOWED_PROTOCOLS: &[&str] = &["http", "https", "ftp"];

/// Validate that a string is a well-formed URL.
///
/// The scheme is optional (`example.com/path` passes), but when present it
/// must be one of [`ALLOWED_PROTOCOLS`]. Domain hosts need a top-level
/// domain, so `localhost` or `not-a-url` are rejected.
pub fn is_url(s: &str) -> bool {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }

    let candidate: Cow<'_, str> = if s.contains("://") {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("http://{}", s))
    };

    if !validator::validate_url(candidate.as_ref()) {
        return false;
    }

    match Url::parse(&candidate) {
        Ok(url) => {
            ALLOWED_PROTOCOLS.contains(&url.scheme())
                && match url.host() {
                    Some(Host::Domain(domain)) => has_top_level_domain(domain),
                    Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
                    None => false,
                }
        }
        Err(_) => false,
    }
}

fn has_top_level_domain(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.');
    match domain.rsplit_once('.') {
        Some((rest, tld)) => {
            !rest.is_empty()
                && rest.split('.').all(|label| !label.is_empty())
                && (tld.starts_with("xn--")
                    || (tld.len() >= 2 && tld.chars().all(|c| c.is_alphabetic())))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://example.com", true)]
    #[test_case("http://example.com/path?q=1&amp;r=2", true)]
    #[test_case("example.com", true)]
    #[test_case("sub.example.co.uk/a/b", true)]
    #[test_case("ftp://files.example.org", true)]
    #[test_case("http://127.0.0.1:8080", true)]
    #[test_case("not-a-url", false)]
    #[test_case("http://localhost", false)]
    #[test_case("javascript:alert(1)", false)]
    #[test_case("mailto://user@example.com", false)]
    #[test_case("https://exa mple.com", false)]
    #[test_case("", false)]
    fn test_is_url(input: &str, expected: bool) {
        assert_eq!(is_url(input), expected);
    }
}
