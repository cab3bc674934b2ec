//! Crawl coordinator - main run orchestration logic
//!
//! This module wires the stages of one run together:
//! - Collecting the chapter list from the index pages
//! - Downloading every chapter under the concurrency gate
//! - Merging the results in discovery order
//! - Writing the output document

use crate::config::RuleSet;
use crate::crawler::collector::collect_chapters;
use crate::crawler::downloader::Downloader;
use crate::crawler::extractor::{NextPageFilter, PathPattern};
use crate::crawler::fetcher::{Fetcher, HttpSource, PageSource, RetryPolicy};
use crate::output::{render_document, write_document, RunSummary};
use crate::ScrollError;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    rules: Arc<RuleSet>,
    fetcher: Fetcher,
    filter: Arc<dyn NextPageFilter>,
    concurrency: usize,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `rules` - The validated site ruleset
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrollError)` - The HTTP client or next-page pattern could not be built
    pub fn new(rules: RuleSet) -> Result<Self, ScrollError> {
        let source = HttpSource::new()?;
        Self::with_source(rules, Arc::new(source))
    }

    /// Creates a coordinator over any page source
    pub fn with_source(rules: RuleSet, source: Arc<dyn PageSource>) -> Result<Self, ScrollError> {
        let filter = PathPattern::new(&rules.selectors.chapter_content.next_page_pattern)?;
        let fetcher = Fetcher::new(source, RetryPolicy::from(&rules.retry));
        let concurrency = rules.concurrency;

        Ok(Self {
            rules: Arc::new(rules),
            fetcher,
            filter: Arc::new(filter),
            concurrency,
        })
    }

    /// Replaces the next-page filter built from the ruleset's pattern
    pub fn with_next_page_filter(mut self, filter: Arc<dyn NextPageFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Overrides the ruleset's concurrency; values below 1 become 1
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Runs a full crawl of the book at `index_url`
    ///
    /// 1. Collect the chapter list (fatal if the main index fails)
    /// 2. Stop with `NoChapters` if nothing was discovered
    /// 3. Download all chapters under the concurrency gate
    /// 4. Render the merged document in discovery order
    /// 5. Write `<output_dir>/<title>.txt`
    pub async fn run(&self, index_url: &Url, output_dir: &Path) -> Result<RunSummary, ScrollError> {
        let start_time = Instant::now();

        let index = collect_chapters(&self.fetcher, &self.rules, index_url).await?;
        if index.chapters.is_empty() {
            return Err(ScrollError::NoChapters {
                url: index_url.to_string(),
            });
        }
        if index.pages_failed > 0 {
            tracing::warn!(
                "{} index pages could not be fetched; the chapter list may be incomplete",
                index.pages_failed
            );
        }

        let downloader = Downloader::new(
            self.fetcher.clone(),
            self.rules.selectors.chapter_content.clone(),
            Arc::clone(&self.filter),
            self.concurrency,
        )
        .allow_empty_content(self.rules.allow_empty_content);

        let results = downloader.download_all(&index.chapters).await;
        let succeeded = results.iter().filter(|r| r.success).count();
        let total = results.len();

        let document = render_document(&index.title, results);
        let output_path = write_document(output_dir, &index.title, &document)?;

        let summary = RunSummary {
            book_title: index.title,
            output_path,
            total,
            succeeded,
            failed: total - succeeded,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} chapters in {:?}",
            summary.total,
            summary.elapsed
        );

        Ok(summary)
    }
}

/// Runs a complete crawl with an HTTP-backed coordinator
///
/// # Example
///
/// ```no_run
/// use sumi_scroll::config::load_ruleset;
/// use sumi_scroll::crawler::run_crawl;
/// use std::path::Path;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rules = load_ruleset(Path::new("config.toml"))?;
/// let index = Url::parse("https://books.example.com/book/7/")?;
/// let summary = run_crawl(rules, &index, Path::new(".")).await?;
/// println!("wrote {}", summary.output_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    rules: RuleSet,
    index_url: &Url,
    output_dir: &Path,
) -> Result<RunSummary, ScrollError> {
    Coordinator::new(rules)?.run(index_url, output_dir).await
}
