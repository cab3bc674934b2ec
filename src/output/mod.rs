//! Output module for the merged book document
//!
//! This module handles:
//! - Merging chapter results into one ordered document
//! - Turning the book title into a safe file name
//! - Writing the document and reporting the run summary

mod merge;
mod sanitize;
pub mod stats;

pub use merge::{failure_placeholder, render_document};
pub use sanitize::sanitize_file_name;
pub use stats::{format_summary, print_summary, RunSummary};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the merged document to `<dir>/<sanitized title>.txt`
///
/// The directory is created when missing. The file is written once.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(std::io::Error)` - Failed to create the directory or write the file
pub fn write_document(dir: &Path, title: &str, document: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.txt", sanitize_file_name(title)));
    let mut file = fs::File::create(&path)?;
    file.write_all(document.as_bytes())?;
    file.flush()?;

    tracing::info!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(path)
}
