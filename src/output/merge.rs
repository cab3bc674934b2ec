//! Order-preserving document merge
//!
//! Chapter results arrive in whatever order downloads finished; the merged
//! document always lists them by discovery index, with a visible
//! placeholder for every failed chapter.

use crate::crawler::ChapterResult;

/// Width of the banner and separator rules
const RULE_WIDTH: usize = 50;

/// Renders the final document
///
/// # Layout
///
/// ```text
/// ==================================================
/// <book title>
/// ==================================================
///
/// <chapter title>
///
/// <content, or [Download failed: <reason>]>
///
/// --------------------------------------------------
///
/// ```
pub fn render_document(book_title: &str, mut results: Vec<ChapterResult>) -> String {
    results.sort_by_key(|r| r.index);

    let banner = "=".repeat(RULE_WIDTH);
    let separator = "-".repeat(RULE_WIDTH);

    let mut doc = String::new();
    doc.push_str(&format!("{}\n{}\n{}\n\n", banner, book_title, banner));

    for result in &results {
        doc.push_str(&result.title);
        doc.push_str("\n\n");
        doc.push_str(&chapter_body(result));
        doc.push_str("\n\n");
        doc.push_str(&separator);
        doc.push_str("\n\n");
    }

    doc
}

/// Content of a successful chapter, or the failure placeholder
fn chapter_body(result: &ChapterResult) -> String {
    if result.success && !result.content.is_empty() {
        result.content.clone()
    } else {
        failure_placeholder(result.error_reason.as_deref().unwrap_or("no content"))
    }
}

/// Placeholder written in place of a chapter that could not be downloaded
pub fn failure_placeholder(reason: &str) -> String {
    format!("[Download failed: {}]", reason)
}
