//! URL handling module for Sumi-Scroll
//!
//! This module provides page URL parsing, relative link resolution, and the
//! canonical key used to deduplicate chapter links.

mod resolve;

pub use resolve::{canonical_key, parse_page_url, resolve_url};
