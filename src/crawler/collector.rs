//! Chapter-list collection across index pagination
//!
//! Index pages are scanned one after another, never concurrently, so a
//! book with many chapter groups does not hammer the index.

use crate::config::RuleSet;
use crate::crawler::extractor::parse_index_page;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::types::{BookIndex, ChapterRef};
use crate::url::{canonical_key, resolve_url};
use crate::{ConfigError, ScrollError};
use std::collections::HashSet;
use url::Url;

/// Accumulates chapter references in discovery order, keyed by canonical URL
#[derive(Debug, Default)]
pub struct ChapterListBuilder {
    seen: HashSet<String>,
    chapters: Vec<ChapterRef>,
}

impl ChapterListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chapter unless its canonical key was already seen
    ///
    /// Returns true when the chapter was added.
    pub fn push(&mut self, url: Url, title: String) -> bool {
        if !self.seen.insert(canonical_key(&url)) {
            return false;
        }
        self.chapters.push(ChapterRef { url, title });
        true
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn finish(self) -> Vec<ChapterRef> {
        self.chapters
    }
}

/// Builds the list of index pages to scan: the main page, then every
/// pagination option not already listed
pub fn index_pages(main_url: &Url, options: Vec<Url>) -> Vec<Url> {
    let mut seen = HashSet::new();
    seen.insert(main_url.to_string());

    let mut pages = vec![main_url.clone()];
    for option in options {
        if seen.insert(option.to_string()) {
            pages.push(option);
        }
    }
    pages
}

/// Collects the book title and its chapter list
///
/// # Steps
///
/// 1. Fetch the main index page (fatal on failure)
/// 2. Read the book title and chapter-group pagination options from it
/// 3. Scan every index page in order, reusing the main page body, and add
///    each chapter link not seen before
///
/// Failures on the remaining index pages are logged and skipped.
pub async fn collect_chapters(
    fetcher: &Fetcher,
    rules: &RuleSet,
    main_url: &Url,
) -> Result<BookIndex, ScrollError> {
    let base_url = Url::parse(&rules.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", rules.base_url, e)))?;

    tracing::info!("Fetching chapter index: {}", main_url);
    let main_body = fetcher.fetch(main_url).await?;
    let main_page = parse_index_page(&main_body, rules, main_url);

    let pages = index_pages(main_url, main_page.pagination.clone());
    if pages.len() > 1 {
        tracing::info!("Chapter index spans {} pages", pages.len());
    }

    let mut builder = ChapterListBuilder::new();
    let mut pages_scanned = 0;
    let mut pages_failed = 0;

    for (position, page_url) in pages.iter().enumerate() {
        let links = if position == 0 {
            main_page.links.clone()
        } else {
            match fetcher.fetch(page_url).await {
                Ok(body) => parse_index_page(&body, rules, page_url).links,
                Err(e) => {
                    tracing::warn!("Skipping index page {}: {}", page_url, e);
                    pages_failed += 1;
                    continue;
                }
            }
        };
        pages_scanned += 1;

        let before = builder.len();
        for (href, title) in links {
            match resolve_url(&href, &base_url) {
                Some(url) => {
                    builder.push(url, title);
                }
                None => tracing::debug!("Ignoring unresolvable chapter link: {}", href),
            }
        }

        tracing::debug!(
            "Index page {} added {} new chapters",
            page_url,
            builder.len() - before
        );
    }

    let chapters = builder.finish();
    tracing::info!(
        "Discovered {} chapters for '{}'",
        chapters.len(),
        main_page.title
    );

    Ok(BookIndex {
        title: main_page.title,
        chapters,
        pages_scanned,
        pages_failed,
    })
}
