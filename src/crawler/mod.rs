//! Crawler module for chapter discovery and download
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Selector-driven extraction over a queryable document
//! - Chapter-list collection across index pagination
//! - Concurrency-bounded chapter downloading
//! - Overall run coordination

mod collector;
mod coordinator;
pub mod dom;
mod downloader;
pub mod extractor;
mod fetcher;
mod types;

pub use collector::{collect_chapters, index_pages, ChapterListBuilder};
pub use coordinator::{run_crawl, Coordinator};
pub use downloader::{ChapterBody, Downloader, EMPTY_CONTENT_REASON, PAGE_SEPARATOR};
pub use extractor::{ChapterPage, NextPageFilter, PathPattern};
pub use fetcher::{
    build_http_client, Fetcher, HttpSource, PageSource, RetryPolicy, REQUEST_TIMEOUT, USER_AGENT,
};
pub use types::{BookIndex, ChapterRef, ChapterResult, UNKNOWN_TITLE};
