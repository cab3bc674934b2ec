use crate::UrlError;
use url::Url;

/// Parses a page URL given on the command line or in a ruleset
///
/// Only HTTP and HTTPS URLs are accepted.
///
/// # Examples
///
/// ```
/// use sumi_scroll::url::parse_page_url;
///
/// let url = parse_page_url("https://books.example.com/book/1/").unwrap();
/// assert_eq!(url.host_str(), Some("books.example.com"));
/// assert!(parse_page_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_page_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Resolves a possibly-relative href against a base URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use sumi_scroll::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://books.example.com/book/1/").unwrap();
/// let url = resolve_url("2.html", &base).unwrap();
/// assert_eq!(url.as_str(), "https://books.example.com/book/1/2.html");
/// ```
pub fn resolve_url(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}

/// Returns the deduplication key of a chapter URL: the URL without its
/// query string
///
/// # Examples
///
/// ```
/// use sumi_scroll::url::canonical_key;
/// use url::Url;
///
/// let url = Url::parse("https://books.example.com/1/2.html?from=index").unwrap();
/// assert_eq!(canonical_key(&url), "https://books.example.com/1/2.html");
/// ```
pub fn canonical_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_query(None);
    key.to_string()
}
