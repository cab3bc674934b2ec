//! Selector-based document querying
//!
//! The extractor only needs four things from an HTML engine: run a selector
//! against a document or element, read an attribute, and read text. Those
//! are captured by [`Document`] and [`Element`]; [`HtmlDocument`] implements
//! them over `scraper`.

use scraper::{ElementRef, Html, Selector};

/// A parsed document that can be queried by selector
pub trait Document {
    type Element<'a>: Element<'a>
    where
        Self: 'a;

    /// Returns every element matching `selector`, in document order
    ///
    /// A selector that matches nothing, or cannot be parsed, yields an
    /// empty list.
    fn query(&self, selector: &str) -> Vec<Self::Element<'_>>;
}

/// A single element of a [`Document`]
pub trait Element<'a>: Copy {
    /// Returns matching descendants, in document order
    fn query(&self, selector: &str) -> Vec<Self>;

    fn attr(&self, name: &str) -> Option<&'a str>;

    /// Text content with whitespace runs collapsed to single spaces
    fn text_content(&self) -> String;

    /// Text content as trimmed lines, one per non-empty text node, skipping
    /// anything inside the `excluded` tags
    fn text_lines(&self, excluded: &[&str]) -> String;
}

/// `scraper`-backed [`Document`]
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::trace!("Ignoring unparsable selector '{}': {:?}", selector, e);
            None
        }
    }
}

impl Document for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn query(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(parsed) => self.html.select(&parsed).collect(),
            None => Vec::new(),
        }
    }
}

impl<'a> Element<'a> for ElementRef<'a> {
    fn query(&self, selector: &str) -> Vec<Self> {
        match parse_selector(selector) {
            Some(parsed) => self.select(&parsed).collect(),
            None => Vec::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    fn text_content(&self) -> String {
        let raw: String = self.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn text_lines(&self, excluded: &[&str]) -> String {
        let root = self.id();
        let mut lines = Vec::new();

        for node in self.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };

            let hidden = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != root)
                .chain(std::iter::once(**self))
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|element| excluded.contains(&element.name()));
            if hidden {
                continue;
            }

            let line = text.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }

        lines.join("\n")
    }
}
