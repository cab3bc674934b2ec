//! Run summary reporting
//!
//! This module provides the end-of-run summary and its console rendering.

use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one complete crawl
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Sanitized book title
    pub book_title: String,

    /// Where the merged document was written
    pub output_path: PathBuf,

    /// Number of chapters discovered
    pub total: usize,

    pub succeeded: usize,

    pub failed: usize,

    pub elapsed: Duration,
}

impl RunSummary {
    /// Percentage of chapters downloaded successfully
    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            self.succeeded as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Formats a summary for the console
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Summary ===\n\n");
    out.push_str(&format!("  Book: {}\n", summary.book_title));
    out.push_str(&format!("  Chapters: {}\n", summary.total));
    out.push_str(&format!(
        "  Succeeded: {} ({:.1}%)\n",
        summary.succeeded,
        summary.success_rate()
    ));
    out.push_str(&format!("  Failed: {}\n", summary.failed));
    out.push_str(&format!("  Elapsed: {:.1}s\n", summary.elapsed.as_secs_f64()));
    out.push_str(&format!("  Output: {}\n", summary.output_path.display()));

    out
}

/// Prints a summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("{}", format_summary(summary));
}
