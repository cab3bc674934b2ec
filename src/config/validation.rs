use crate::config::types::{
    ChapterContentSelectors, ChapterListSelectors, PaginationSelectors, RetryConfig, RuleSet,
};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Upper bound on chapters downloaded at once
pub const MAX_CONCURRENCY: usize = 1000;

/// Validates the entire ruleset
pub fn validate(rules: &RuleSet) -> Result<(), ConfigError> {
    validate_base_url(&rules.base_url)?;
    validate_selector("book-title", &rules.selectors.book_title)?;
    validate_chapter_list(&rules.selectors.chapter_list)?;
    if let Some(pagination) = &rules.selectors.chapter_pagination {
        validate_pagination(pagination)?;
    }
    validate_chapter_content(&rules.selectors.chapter_content)?;

    if rules.concurrency < 1 || rules.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, rules.concurrency
        )));
    }

    validate_retry(&rules.retry)?;
    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            base_url
        )));
    }

    Ok(())
}

fn validate_chapter_list(selectors: &ChapterListSelectors) -> Result<(), ConfigError> {
    validate_selector("chapter-list.container", &selectors.container)?;
    validate_selector("chapter-list.list", &selectors.list)?;
    validate_selector("chapter-list.item", &selectors.item)?;
    validate_selector("chapter-list.link", &selectors.link)?;
    validate_attr("chapter-list.link-attr", &selectors.link_attr)
}

fn validate_pagination(selectors: &PaginationSelectors) -> Result<(), ConfigError> {
    validate_selector("chapter-pagination.selector", &selectors.selector)?;
    validate_selector("chapter-pagination.option", &selectors.option)?;
    validate_attr("chapter-pagination.value-attr", &selectors.value_attr)
}

fn validate_chapter_content(selectors: &ChapterContentSelectors) -> Result<(), ConfigError> {
    validate_selector("chapter-content.title", &selectors.title)?;
    validate_selector("chapter-content.content", &selectors.content)?;
    validate_selector("chapter-content.next-page", &selectors.next_page)?;
    validate_attr("chapter-content.next-page-attr", &selectors.next_page_attr)?;

    Regex::new(&selectors.next_page_pattern).map_err(|e| {
        ConfigError::InvalidPattern(format!("'{}': {}", selectors.next_page_pattern, e))
    })?;

    Ok(())
}

fn validate_retry(retry: &RetryConfig) -> Result<(), ConfigError> {
    if retry.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry.max-attempts must be >= 1, got {}",
            retry.max_attempts
        )));
    }

    if retry.max_attempts > 1 && retry.delays.is_empty() {
        return Err(ConfigError::Validation(
            "retry.delays cannot be empty when max-attempts > 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a selector is non-empty and parses as CSS
fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!(
            "{} cannot be empty",
            name
        )));
    }

    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", name, selector, e)))?;

    Ok(())
}

fn validate_attr(name: &str, attr: &str) -> Result<(), ConfigError> {
    if attr.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}
