use serde::Deserialize;
use std::time::Duration;

/// Site extraction ruleset
///
/// Loaded once at startup and shared read-only by every crawl stage.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    /// Base URL that relative chapter links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Selector paths for every extraction step
    pub selectors: Selectors,

    /// Maximum number of chapters downloaded at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Treat a chapter that yields no text as a success
    #[serde(rename = "allow-empty-content", default)]
    pub allow_empty_content: bool,

    /// Retry behavior for every page request
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Selector groups
#[derive(Debug, Clone, Deserialize)]
pub struct Selectors {
    /// Selector for the book title on the main index page
    #[serde(rename = "book-title")]
    pub book_title: String,

    #[serde(rename = "chapter-list")]
    pub chapter_list: ChapterListSelectors,

    /// Chapter-group pagination control; absent for single-page indexes
    #[serde(rename = "chapter-pagination", default)]
    pub chapter_pagination: Option<PaginationSelectors>,

    #[serde(rename = "chapter-content")]
    pub chapter_content: ChapterContentSelectors,
}

/// Container → list → item → link chain for the chapter index
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterListSelectors {
    pub container: String,
    pub list: String,
    pub item: String,
    pub link: String,

    /// Attribute holding the chapter URL
    #[serde(rename = "link-attr", default = "default_href")]
    pub link_attr: String,
}

/// Chapter-group pagination control (usually a `<select>`)
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSelectors {
    pub selector: String,

    #[serde(default = "default_option")]
    pub option: String,

    #[serde(rename = "value-attr", default = "default_value")]
    pub value_attr: String,
}

/// Per-page chapter selectors
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterContentSelectors {
    pub title: String,
    pub content: String,

    #[serde(rename = "next-page")]
    pub next_page: String,

    #[serde(rename = "next-page-attr", default = "default_href")]
    pub next_page_attr: String,

    /// Regex a next-page URL path must match to count as a continuation
    #[serde(rename = "next-page-pattern", default = "default_next_page_pattern")]
    pub next_page_pattern: String,
}

/// Retry configuration for page requests
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first one
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait before each retry in milliseconds; the last entry repeats
    #[serde(default = "default_delays")]
    pub delays: Vec<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delays: default_delays(),
        }
    }
}

impl RetryConfig {
    /// Returns the configured delays as durations
    pub fn delay_durations(&self) -> Vec<Duration> {
        self.delays
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }
}

fn default_concurrency() -> usize {
    15
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delays() -> Vec<u64> {
    vec![1000, 2000, 4000]
}

fn default_href() -> String {
    "href".to_string()
}

fn default_option() -> String {
    "option".to_string()
}

fn default_value() -> String {
    "value".to_string()
}

fn default_next_page_pattern() -> String {
    r"_\d+\.html$".to_string()
}
