//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small paginated book and check the
//! full collect → download → merge → write cycle end-to-end.

use std::time::Duration;
use sumi_scroll::config::parse_ruleset;
use sumi_scroll::crawler::Coordinator;
use sumi_scroll::{RuleSet, ScrollError};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a ruleset pointing at the mock server
fn create_test_ruleset(base_url: &str, max_attempts: u32) -> RuleSet {
    parse_ruleset(&format!(
        r##"
base-url = "{base_url}"
concurrency = 3

[selectors]
book-title = "#info h1"

[selectors.chapter-list]
container = "#list"
list = "dl"
item = "dd"
link = "a"

[selectors.chapter-pagination]
selector = "select#group"

[selectors.chapter-content]
title = "h1.title"
content = "#content"
next-page = "a.next"

[retry]
max-attempts = {max_attempts}
delays = [10, 20]
"##
    ))
    .expect("Failed to parse test ruleset")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn index_page(groups: &[&str], links: &[(&str, &str)]) -> String {
    let options: String = groups
        .iter()
        .map(|g| format!(r#"<option value="{}">{}</option>"#, g, g))
        .collect();
    let items: String = links
        .iter()
        .map(|(href, text)| format!(r#"<dd><a href="{}">{}</a></dd>"#, href, text))
        .collect();
    format!(
        r#"<div id="info"><h1>Night Rain</h1></div>
        <select id="group">{options}</select>
        <div id="list"><dl>{items}</dl></div>"#
    )
}

fn chapter_page(title: &str, content: &str, next: Option<&str>) -> String {
    let next = next
        .map(|href| format!(r#"<a class="next" href="{}">Next page</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<h1 class="title">{title}</h1>
        <div id="content">{content}<script>document.write("ad")</script></div>
        <a class="next" href="/book/">Back to index</a>
        {next}"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_paginated_book() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Two index pages with one overlapping chapter
    mount_page(
        &mock_server,
        "/book/",
        index_page(
            &["/book/", "/book/index_2.html"],
            &[("/book/1.html", "Chapter 1"), ("/book/2.html", "Chapter 2")],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/book/index_2.html",
        index_page(
            &["/book/", "/book/index_2.html"],
            &[("/book/2.html?from=2", "Chapter 2 again"), ("/book/3.html", "Chapter 3")],
        ),
    )
    .await;

    // Chapter 1 spans two pages
    mount_page(
        &mock_server,
        "/book/1.html",
        chapter_page("Chapter 1 (1/2)", "Part1", Some("1_2.html")),
    )
    .await;
    mount_page(
        &mock_server,
        "/book/1_2.html",
        chapter_page("Chapter 1 (2/2)", "Part2", None),
    )
    .await;

    // Chapter 2 is slow, so it finishes after chapter 3
    Mock::given(method("GET"))
        .and(path("/book/2.html"))
        .respond_with(
            html(chapter_page("Chapter 2", "Slow text", None))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/book/3.html",
        chapter_page("Chapter 3", "Fast text", None),
    )
    .await;

    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let rules = create_test_ruleset(&base_url, 2);
    let index_url = Url::parse(&format!("{}/book/", base_url)).unwrap();

    let coordinator = Coordinator::new(rules).expect("Failed to create coordinator");
    let summary = coordinator
        .run(&index_url, output.path())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.output_path, output.path().join("Night Rain.txt"));

    let text = std::fs::read_to_string(&summary.output_path).expect("Output missing");
    assert!(text.starts_with(&format!("{0}\nNight Rain\n{0}\n\n", "=".repeat(50))));
    assert!(text.contains("Chapter 1\n\nPart1\n\nPart2\n\n"));
    assert!(!text.contains("document.write"));
    assert!(!text.contains("Chapter 2 again"));

    let one = text.find("Part1").unwrap();
    let two = text.find("Slow text").unwrap();
    let three = text.find("Fast text").unwrap();
    assert!(one < two && two < three, "chapters out of order:\n{}", text);
}

#[tokio::test]
async fn test_failed_chapter_placeholder_and_retries() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/book/",
        index_page(
            &[],
            &[("/book/1.html", "Chapter 1"), ("/book/2.html", "Chapter 2")],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/book/1.html",
        chapter_page("Chapter 1", "Only text", None),
    )
    .await;

    // Chapter 2 always fails; every attempt must be made
    Mock::given(method("GET"))
        .and(path("/book/2.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let rules = create_test_ruleset(&base_url, 3);
    let index_url = Url::parse(&format!("{}/book/", base_url)).unwrap();

    let summary = Coordinator::new(rules)
        .expect("Failed to create coordinator")
        .run(&index_url, output.path())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    let text = std::fs::read_to_string(&summary.output_path).expect("Output missing");
    let placeholder = text.find("[Download failed:").expect("placeholder missing");
    assert!(text[placeholder..].contains("HTTP 500"));
    assert!(text.find("Only text").unwrap() < placeholder);
}

#[tokio::test]
async fn test_no_chapters_is_an_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/book/", index_page(&[], &[])).await;

    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let rules = create_test_ruleset(&base_url, 1);
    let index_url = Url::parse(&format!("{}/book/", base_url)).unwrap();

    let result = Coordinator::new(rules)
        .expect("Failed to create coordinator")
        .run(&index_url, output.path())
        .await;

    assert!(matches!(result, Err(ScrollError::NoChapters { .. })));
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_concurrency_override_still_completes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<(String, String)> = (1..=6)
        .map(|i| (format!("/book/{}.html", i), format!("Chapter {}", i)))
        .collect();
    let link_refs: Vec<(&str, &str)> = links
        .iter()
        .map(|(h, t)| (h.as_str(), t.as_str()))
        .collect();
    mount_page(&mock_server, "/book/", index_page(&[], &link_refs)).await;

    for (href, title) in &links {
        mount_page(
            &mock_server,
            href,
            chapter_page(title, &format!("Body of {}", title), None),
        )
        .await;
    }

    let output = tempfile::tempdir().expect("Failed to create temp dir");
    let rules = create_test_ruleset(&base_url, 1);
    let index_url = Url::parse(&format!("{}/book/", base_url)).unwrap();

    let summary = Coordinator::new(rules)
        .expect("Failed to create coordinator")
        .with_concurrency(1)
        .run(&index_url, output.path())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.succeeded, 6);
    let text = std::fs::read_to_string(&summary.output_path).unwrap();
    let positions: Vec<usize> = (1..=6)
        .map(|i| text.find(&format!("Body of Chapter {}", i)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}
