use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves and normalizes a review link found on a listing page
///
/// # Normalization Steps
///
/// 1. Resolve `href` against `base_url`; reject if malformed
/// 2. Require an HTTP(S) scheme and a host
/// 3. Remove the fragment (everything after `#`)
/// 4. Collapse runs of `/` in the path into a single slash
///
/// Query strings are kept as-is; review links do not carry tracking noise.
///
/// # Examples
///
/// ```
/// use rating_scan::url::normalize_review_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let a = normalize_review_url("/comm/42/1.htm#addcomm", &base).unwrap();
/// let b = normalize_review_url("https://example.com//comm/42/1.htm", &base).unwrap();
/// assert_eq!(a, "https://example.com/comm/42/1.htm");
/// assert_eq!(a, b);
/// ```
pub fn normalize_review_url(href: &str, base_url: &Url) -> UrlResult<String> {
    let mut url = base_url
        .join(href.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    let path = collapse_slashes(url.path());
    url.set_path(&path);

    Ok(url.to_string())
}

/// Collapses repeated slashes in a path, keeping a single leading and
/// trailing slash where present
pub fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;

    for c in path.chars() {
        if c == '/' {
            if !previous_slash {
                collapsed.push(c);
            }
            previous_slash = true;
        } else {
            collapsed.push(c);
            previous_slash = false;
        }
    }

    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://host/").unwrap()
    }

    #[test]
    fn test_fragment_is_stripped() {
        let with_fragment = normalize_review_url("https://host/comm/42/1.htm#addcomm", &base_url());
        let without = normalize_review_url("https://host/comm/42/1.htm", &base_url());
        assert_eq!(with_fragment.unwrap(), without.unwrap());
    }

    #[test]
    fn test_relative_link_is_resolved() {
        let url = normalize_review_url("/comm/27190/1.htm", &base_url()).unwrap();
        assert_eq!(url, "https://host/comm/27190/1.htm");
    }

    #[test]
    fn test_duplicate_slashes_collapse() {
        let url = normalize_review_url("https://host/comm//42///1.htm", &base_url()).unwrap();
        assert_eq!(url, "https://host/comm/42/1.htm");
    }

    #[test]
    fn test_query_is_kept() {
        let url = normalize_review_url("/comm/42/1.htm?sort=new#top", &base_url()).unwrap();
        assert_eq!(url, "https://host/comm/42/1.htm?sort=new");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = normalize_review_url("mailto:admin@host", &base_url());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_collapse_slashes() {
        assert_eq!(collapse_slashes("/"), "/");
        assert_eq!(collapse_slashes("//a//b/"), "/a/b/");
        assert_eq!(collapse_slashes("/a/b"), "/a/b");
    }
}
