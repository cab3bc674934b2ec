//! Concurrency-bounded chapter downloader
//!
//! Every chapter runs its own page-following loop. A global semaphore
//! admits at most `concurrency` chapter loops at a time; the rest wait for
//! a permit. All chapters run to completion and no failure cancels a
//! sibling.

use crate::config::ChapterContentSelectors;
use crate::crawler::extractor::{parse_chapter_page, NextPageFilter};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::types::{ChapterRef, ChapterResult, UNKNOWN_TITLE};
use crate::FetchError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Separator placed between the text of consecutive pages of one chapter
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Reason recorded for a chapter that produced no text
pub const EMPTY_CONTENT_REASON: &str = "no content extracted";

/// Text and title gathered by one chapter's page-following loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterBody {
    pub title: Option<String>,
    pub content: String,

    /// Number of distinct pages fetched
    pub pages: usize,
}

/// Downloads chapters under a global concurrency cap
#[derive(Clone)]
pub struct Downloader {
    fetcher: Fetcher,
    selectors: Arc<ChapterContentSelectors>,
    filter: Arc<dyn NextPageFilter>,
    concurrency: usize,
    allow_empty_content: bool,
}

impl Downloader {
    /// Creates a downloader; a concurrency of 0 is treated as 1
    pub fn new(
        fetcher: Fetcher,
        selectors: ChapterContentSelectors,
        filter: Arc<dyn NextPageFilter>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            selectors: Arc::new(selectors),
            filter,
            concurrency: concurrency.max(1),
            allow_empty_content: false,
        }
    }

    /// Accept chapters whose pages contain no text as successful
    pub fn allow_empty_content(mut self, allow: bool) -> Self {
        self.allow_empty_content = allow;
        self
    }

    /// Follows one chapter's page chain and gathers its text
    ///
    /// # Stop Conditions
    ///
    /// - the page has no next-page link
    /// - the next-page link was already visited (cycle)
    /// - a later page cannot be fetched; the text gathered so far is kept
    ///
    /// Only a failure on the chapter's first page is returned as an error.
    pub async fn follow_pages(&self, start: &Url) -> Result<ChapterBody, FetchError> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = start.clone();
        let mut body = ChapterBody::default();
        let mut parts: Vec<String> = Vec::new();

        loop {
            visited.insert(current.to_string());
            let first_page = body.pages == 0;

            let html = match self.fetcher.fetch(&current).await {
                Ok(html) => html,
                Err(e) if first_page => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Stopping chapter {} at page {}: {}",
                        start,
                        body.pages + 1,
                        e
                    );
                    break;
                }
            };
            body.pages += 1;

            let page = parse_chapter_page(&html, &self.selectors, &current, self.filter.as_ref());
            if first_page {
                body.title = page.title;
            }
            if !page.content.is_empty() {
                parts.push(page.content);
            }

            match page.next_url {
                Some(next) if visited.contains(next.as_str()) => {
                    tracing::debug!("Page cycle detected at {} in chapter {}", next, start);
                    break;
                }
                Some(next) => {
                    tracing::trace!("Following chapter page {}", next);
                    current = next;
                }
                None => break,
            }
        }

        body.content = parts.join(PAGE_SEPARATOR);
        Ok(body)
    }

    /// Downloads one chapter and turns the outcome into a [`ChapterResult`]
    pub async fn download_chapter(&self, index: usize, chapter: &ChapterRef) -> ChapterResult {
        match self.follow_pages(&chapter.url).await {
            Ok(body) => {
                let title = body
                    .title
                    .filter(|t| !t.is_empty())
                    .or_else(|| Some(chapter.title.clone()).filter(|t| !t.is_empty()))
                    .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

                if body.content.is_empty() && !self.allow_empty_content {
                    ChapterResult::failure(index, title, EMPTY_CONTENT_REASON)
                } else {
                    ChapterResult::success(index, title, body.content)
                }
            }
            Err(e) => {
                let title = if chapter.title.is_empty() {
                    UNKNOWN_TITLE.to_string()
                } else {
                    chapter.title.clone()
                };
                ChapterResult::failure(index, title, e.to_string())
            }
        }
    }

    /// Downloads every chapter and returns one result per chapter, sorted
    /// by index
    ///
    /// Completion order is not observable in the return value.
    pub async fn download_all(&self, chapters: &[ChapterRef]) -> Vec<ChapterResult> {
        let total = chapters.len();
        // More permits than chapters never admits more work
        let permits = self.concurrency.min(total.max(1));
        let semaphore = Arc::new(Semaphore::new(permits));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        tracing::info!(
            "Downloading {} chapters ({} at a time)",
            total,
            permits
        );

        for (index, chapter) in chapters.iter().cloned().enumerate() {
            let downloader = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let completed = Arc::clone(&completed);

            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => downloader.download_chapter(index, &chapter).await,
                    Err(_) => ChapterResult::failure(index, chapter.title.clone(), "scheduler closed"),
                };

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                report_progress(done, total, &result);
                result
            });
        }

        let mut slots: Vec<Option<ChapterResult>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    if let Some(slot) = slots.get_mut(result.index) {
                        *slot = Some(result);
                    }
                }
                Err(e) => tracing::error!("Chapter task aborted: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(chapters)
            .enumerate()
            .map(|(index, (slot, chapter))| {
                slot.unwrap_or_else(|| {
                    ChapterResult::failure(index, chapter.title.clone(), "chapter task aborted")
                })
            })
            .collect()
    }
}

fn report_progress(done: usize, total: usize, result: &ChapterResult) {
    let percent = if total > 0 {
        done as f64 / total as f64 * 100.0
    } else {
        100.0
    };

    if result.success {
        tracing::info!("[{}/{}] {:.1}% ✓ {}", done, total, percent, result.title);
    } else {
        tracing::warn!(
            "[{}/{}] {:.1}% ✗ {} ({})",
            done,
            total,
            percent,
            result.title,
            result.error_reason.as_deref().unwrap_or("unknown error")
        );
    }
}
