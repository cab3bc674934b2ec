use url::Url;

/// Sentinel used when no title can be found
pub const UNKNOWN_TITLE: &str = "unknown";

/// A chapter discovered on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    /// Absolute URL of the chapter's first page
    pub url: Url,

    /// Anchor text from the index page
    pub title: String,
}

/// Outcome of downloading one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterResult {
    /// Position of the chapter in the discovered list; the only merge key
    pub index: usize,

    pub title: String,

    /// Text of every page joined by a blank line
    pub content: String,

    pub success: bool,

    /// Why the chapter failed, when it did
    pub error_reason: Option<String>,
}

impl ChapterResult {
    /// Creates a successful result
    pub fn success(index: usize, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            content: content.into(),
            success: true,
            error_reason: None,
        }
    }

    /// Creates a failed result carrying the failure reason
    pub fn failure(index: usize, title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            content: String::new(),
            success: false,
            error_reason: Some(reason.into()),
        }
    }
}

/// The main index page, reduced to what the rest of the crawl needs
#[derive(Debug, Clone)]
pub struct BookIndex {
    /// Sanitized book title
    pub title: String,

    /// Chapters in discovery order, deduplicated by canonical key
    pub chapters: Vec<ChapterRef>,

    /// Number of index pages that were scanned successfully
    pub pages_scanned: usize,

    /// Number of index pages skipped after fetch failures
    pub pages_failed: usize,
}
