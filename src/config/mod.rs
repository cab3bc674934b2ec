//! Configuration module for Sumi-Scroll
//!
//! This module handles loading, parsing, and validating the TOML site
//! ruleset that drives every extraction step.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scroll::config::load_ruleset;
//! use std::path::Path;
//!
//! let rules = load_ruleset(Path::new("config.toml")).unwrap();
//! println!("Chapters will be fetched {} at a time", rules.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ChapterContentSelectors, ChapterListSelectors, PaginationSelectors, RetryConfig, RuleSet,
    Selectors,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_ruleset, load_ruleset_with_hash, parse_ruleset};
pub use validation::{validate, MAX_CONCURRENCY};
