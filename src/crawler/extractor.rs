//! Selector-driven extraction
//!
//! Pure functions that turn a parsed page plus the site ruleset into the
//! facts the crawler needs:
//! - Book title (with `<title>` fallback)
//! - Chapter-group pagination options
//! - Chapter links from the index
//! - Chapter page title, body text and next-page link
//!
//! Nothing here touches the network. A selector that matches nothing is not
//! an error: it simply yields an empty list or `None`.

use crate::config::{ChapterContentSelectors, ChapterListSelectors, PaginationSelectors, RuleSet};
use crate::crawler::dom::{Document, Element, HtmlDocument};
use crate::crawler::types::UNKNOWN_TITLE;
use crate::output::sanitize_file_name;
use crate::url::resolve_url;
use crate::ConfigError;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Tags whose text never ends up in chapter content
const EXCLUDED_TAGS: &[&str] = &["script", "style"];

/// Separators tried, in order of appearance, when splitting a `<title>`
const TITLE_SEPARATORS: &[char] = &['_', '-', '|'];

/// Decides whether a candidate next-page URL continues the current chapter
pub trait NextPageFilter: Send + Sync {
    fn accepts(&self, candidate: &Url) -> bool;
}

impl<F> NextPageFilter for F
where
    F: Fn(&Url) -> bool + Send + Sync,
{
    fn accepts(&self, candidate: &Url) -> bool {
        self(candidate)
    }
}

/// [`NextPageFilter`] matching a regex against the URL path
///
/// The stock pattern `_\d+\.html$` accepts `.../123_2.html` style
/// continuation pages.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: Regex,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
        Ok(Self { pattern })
    }
}

impl NextPageFilter for PathPattern {
    fn accepts(&self, candidate: &Url) -> bool {
        self.pattern.is_match(candidate.path())
    }
}

/// Facts extracted from one chapter page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterPage {
    /// Pagination-cleaned title; only meaningful on a chapter's first page
    pub title: Option<String>,

    /// Body text, scripts and styles excluded
    pub content: String,

    /// The page that continues this chapter, if any
    pub next_url: Option<Url>,
}

/// Facts extracted from one index page
#[derive(Debug, Clone, Default)]
pub struct IndexPage {
    pub title: String,
    pub pagination: Vec<Url>,
    pub links: Vec<(String, String)>,
}

/// Extracts the book title, sanitized for use as a file name
///
/// Falls back to the page's `<title>`, cut at the first `_`, `-` or `|`,
/// and then to `"unknown"`.
pub fn extract_book_title<D: Document>(doc: &D, selector: &str) -> String {
    let from_selector = doc
        .query(selector)
        .first()
        .map(|e| e.text_content())
        .filter(|t| !t.is_empty());

    let title = from_selector
        .or_else(|| {
            doc.query("title")
                .first()
                .map(|e| split_page_title(&e.text_content()))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    sanitize_file_name(&title)
}

/// Keeps the part of a `<title>` before the first site-name separator
fn split_page_title(title: &str) -> String {
    let head = match title.find(TITLE_SEPARATORS) {
        Some(pos) => title[..pos].trim(),
        None => title.trim(),
    };

    if head.is_empty() {
        title.trim().to_string()
    } else {
        head.to_string()
    }
}

/// Lists the chapter-group pages offered by the pagination control
///
/// The main index page itself is not added here.
pub fn extract_pagination_options<D: Document>(
    doc: &D,
    selectors: Option<&PaginationSelectors>,
    page_url: &Url,
) -> Vec<Url> {
    let Some(selectors) = selectors else {
        return Vec::new();
    };

    let mut options = Vec::new();
    for control in doc.query(&selectors.selector) {
        for option in control.query(&selectors.option) {
            if let Some(url) = option
                .attr(&selectors.value_attr)
                .and_then(|value| resolve_url(value, page_url))
            {
                options.push(url);
            }
        }
    }
    options
}

/// Collects `(href, anchor text)` pairs through the container → list →
/// item → link chain
///
/// Items with no href or no anchor text are skipped.
pub fn extract_chapter_links<D: Document>(
    doc: &D,
    selectors: &ChapterListSelectors,
) -> Vec<(String, String)> {
    let mut links = Vec::new();

    for container in doc.query(&selectors.container) {
        for list in container.query(&selectors.list) {
            for item in list.query(&selectors.item) {
                let Some(link) = item.query(&selectors.link).into_iter().next() else {
                    continue;
                };

                let href = link.attr(&selectors.link_attr).map(str::trim).unwrap_or("");
                let text = link.text_content();
                if href.is_empty() || text.is_empty() {
                    tracing::trace!("Skipping chapter item without href or text");
                    continue;
                }

                links.push((href.to_string(), text));
            }
        }
    }

    links
}

/// Extracts title, body text and the next-page link of a chapter page
///
/// The next page is the first next-page candidate that resolves to a URL
/// other than `current` and that `filter` accepts.
pub fn extract_chapter_page<D: Document>(
    doc: &D,
    selectors: &ChapterContentSelectors,
    current: &Url,
    filter: &dyn NextPageFilter,
) -> ChapterPage {
    let title = doc
        .query(&selectors.title)
        .first()
        .map(|e| strip_pagination_marker(&e.text_content()))
        .filter(|t| !t.is_empty());

    let content = doc
        .query(&selectors.content)
        .iter()
        .map(|e| e.text_lines(EXCLUDED_TAGS))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let next_url = doc
        .query(&selectors.next_page)
        .iter()
        .filter_map(|e| e.attr(&selectors.next_page_attr))
        .filter_map(|href| resolve_url(href, current))
        .find(|candidate| candidate != current && filter.accepts(candidate));

    ChapterPage {
        title,
        content,
        next_url,
    }
}

fn pagination_marker() -> Option<&'static Regex> {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    MARKER
        .get_or_init(|| Regex::new(r"[(（]?\s*\d+\s*/\s*\d+\s*[)）]?").ok())
        .as_ref()
}

/// Removes `(12 / 34)` style page counters from a title
///
/// Parentheses are optional; the result has whitespace collapsed.
pub fn strip_pagination_marker(title: &str) -> String {
    let stripped = match pagination_marker() {
        Some(marker) => marker.replace_all(title, " ").into_owned(),
        None => title.to_string(),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses an index page and extracts everything the collector uses
pub fn parse_index_page(html: &str, rules: &RuleSet, page_url: &Url) -> IndexPage {
    let doc = HtmlDocument::parse(html);
    IndexPage {
        title: extract_book_title(&doc, &rules.selectors.book_title),
        pagination: extract_pagination_options(
            &doc,
            rules.selectors.chapter_pagination.as_ref(),
            page_url,
        ),
        links: extract_chapter_links(&doc, &rules.selectors.chapter_list),
    }
}

/// Parses a chapter page and extracts its title, text and next link
pub fn parse_chapter_page(
    html: &str,
    selectors: &ChapterContentSelectors,
    current: &Url,
    filter: &dyn NextPageFilter,
) -> ChapterPage {
    let doc = HtmlDocument::parse(html);
    extract_chapter_page(&doc, selectors, current, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_selectors() -> ChapterContentSelectors {
        ChapterContentSelectors {
            title: "h1".to_string(),
            content: "#content".to_string(),
            next_page: "a.next".to_string(),
            next_page_attr: "href".to_string(),
            next_page_pattern: r"_\d+\.html$".to_string(),
        }
    }

    fn list_selectors() -> ChapterListSelectors {
        ChapterListSelectors {
            container: "#list".to_string(),
            list: "dl".to_string(),
            item: "dd".to_string(),
            link: "a".to_string(),
            link_attr: "href".to_string(),
        }
    }

    fn default_filter() -> PathPattern {
        PathPattern::new(r"_\d+\.html$").unwrap()
    }

    fn page_url() -> Url {
        Url::parse("https://books.example.com/book/7/100.html").unwrap()
    }

    #[test]
    fn test_book_title_from_selector() {
        let doc = HtmlDocument::parse(
            r#"<title>Ignored</title><div id="info"><h1> The Long Road </h1></div>"#,
        );
        assert_eq!(extract_book_title(&doc, "#info h1"), "The Long Road");
    }

    #[test]
    fn test_book_title_falls_back_to_page_title() {
        let doc = HtmlDocument::parse(
            "<html><head><title>The Long Road_Free Reading-Example Books</title></head></html>",
        );
        assert_eq!(extract_book_title(&doc, "#info h1"), "The Long Road");
    }

    #[test]
    fn test_book_title_split_uses_first_separator() {
        let doc = HtmlDocument::parse("<title>Moon | Tide_Site</title>");
        assert_eq!(extract_book_title(&doc, "h1"), "Moon");
    }

    #[test]
    fn test_book_title_unknown() {
        let doc = HtmlDocument::parse("<html><body><p>nothing</p></body></html>");
        assert_eq!(extract_book_title(&doc, "h1"), UNKNOWN_TITLE);
    }

    #[test]
    fn test_book_title_is_sanitized() {
        let doc = HtmlDocument::parse(r#"<h1>What?  A / B: "C"</h1>"#);
        assert_eq!(extract_book_title(&doc, "h1"), "What_ A _ B_ _C_");
    }

    #[test]
    fn test_pagination_options_in_order() {
        let doc = HtmlDocument::parse(
            r#"<select class="pages">
                <option value="/book/7/index_2.html">51-100</option>
                <option value="index_3.html">101-150</option>
                <option>no value</option>
            </select>"#,
        );
        let selectors = PaginationSelectors {
            selector: "select.pages".to_string(),
            option: "option".to_string(),
            value_attr: "value".to_string(),
        };
        let base = Url::parse("https://books.example.com/book/7/").unwrap();

        let options = extract_pagination_options(&doc, Some(&selectors), &base);

        assert_eq!(
            options.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec![
                "https://books.example.com/book/7/index_2.html",
                "https://books.example.com/book/7/index_3.html",
            ]
        );
    }

    #[test]
    fn test_pagination_absent() {
        let doc = HtmlDocument::parse("<div></div>");
        let selectors = PaginationSelectors {
            selector: "select.pages".to_string(),
            option: "option".to_string(),
            value_attr: "value".to_string(),
        };
        assert!(extract_pagination_options(&doc, Some(&selectors), &page_url()).is_empty());
        assert!(extract_pagination_options(&doc, None, &page_url()).is_empty());
    }

    #[test]
    fn test_chapter_links_skip_incomplete_items() {
        let doc = HtmlDocument::parse(
            r#"<a href="/outside.html">Outside</a>
            <div id="list"><dl>
                <dd><a href="/book/7/1.html">Chapter 1</a></dd>
                <dd><a>No href</a></dd>
                <dd><a href="/book/7/3.html">   </a></dd>
                <dd><span>No link</span></dd>
                <dd><a href="/book/7/2.html">Chapter 2</a></dd>
            </dl></div>"#,
        );

        let links = extract_chapter_links(&doc, &list_selectors());

        assert_eq!(
            links,
            vec![
                ("/book/7/1.html".to_string(), "Chapter 1".to_string()),
                ("/book/7/2.html".to_string(), "Chapter 2".to_string()),
            ]
        );
    }

    #[test]
    fn test_chapter_page_extraction() {
        let doc = HtmlDocument::parse(
            r#"<h1>Chapter 1 (1 / 3)</h1>
            <div id="content">First line<br>Second line<script>track()</script></div>
            <a class="next" href="100_2.html">Next</a>"#,
        );

        let page = extract_chapter_page(&doc, &content_selectors(), &page_url(), &default_filter());

        assert_eq!(page.title.as_deref(), Some("Chapter 1"));
        assert_eq!(page.content, "First line\nSecond line");
        assert_eq!(
            page.next_url.unwrap().as_str(),
            "https://books.example.com/book/7/100_2.html"
        );
    }

    #[test]
    fn test_next_page_skips_self_and_non_matching() {
        let doc = HtmlDocument::parse(
            r#"<a class="next" href="100.html">Self</a>
            <a class="next" href="101.html">Next chapter</a>
            <a class="next" href="100_2.html">Next page</a>"#,
        );

        let page = extract_chapter_page(&doc, &content_selectors(), &page_url(), &default_filter());

        assert_eq!(
            page.next_url.unwrap().as_str(),
            "https://books.example.com/book/7/100_2.html"
        );
    }

    #[test]
    fn test_next_page_none_when_nothing_matches() {
        let doc = HtmlDocument::parse(r#"<a class="next" href="101.html">Next chapter</a>"#);
        let page = extract_chapter_page(&doc, &content_selectors(), &page_url(), &default_filter());
        assert!(page.next_url.is_none());
        assert!(page.title.is_none());
        assert!(page.content.is_empty());
    }

    #[test]
    fn test_closure_filter() {
        let doc = HtmlDocument::parse(r#"<a class="next" href="101.html">Next</a>"#);
        let accept_all = |_: &Url| true;

        let page = extract_chapter_page(&doc, &content_selectors(), &page_url(), &accept_all);

        assert_eq!(
            page.next_url.unwrap().as_str(),
            "https://books.example.com/book/7/101.html"
        );
    }

    #[test]
    fn test_path_pattern_requires_underscore() {
        let filter = default_filter();
        let yes = Url::parse("https://books.example.com/7/100_12.html").unwrap();
        let no = Url::parse("https://books.example.com/7/10012.html").unwrap();
        assert!(filter.accepts(&yes));
        assert!(!filter.accepts(&no));
    }

    #[test]
    fn test_strip_pagination_marker() {
        assert_eq!(strip_pagination_marker("Chapter 3 (12 / 34)"), "Chapter 3");
        assert_eq!(strip_pagination_marker("Chapter 3 2/5"), "Chapter 3");
        assert_eq!(strip_pagination_marker("（1/2）Prologue"), "Prologue");
        assert_eq!(strip_pagination_marker("Plain Title"), "Plain Title");
    }
}
