//! HTML parser for extracting links
//!
//! This module handles:
//! - Turning a fetched body into an HTML document
//! - Walking the document for `<a href>` values in document order

use crate::crawler::fetcher::FetchedPage;
use crate::url::resolve_links;
use crate::ParseError;
use scraper::{ElementRef, Html};
use url::Url;

/// Parses a fetched page into an HTML document
///
/// A page whose `Content-Type` is present and is not an HTML type is
/// rejected; a missing header is treated as HTML. The HTML parser itself
/// recovers from malformed markup and never fails.
pub fn parse_page(page: &FetchedPage) -> Result<Html, ParseError> {
    if let Some(content_type) = &page.content_type {
        if !is_html_content_type(content_type) {
            return Err(ParseError::NotHtml {
                url: page.final_url.to_string(),
                content_type: content_type.clone(),
            });
        }
    }

    Ok(Html::parse_document(&page.body))
}

/// Returns true for `text/html` and `application/xhtml+xml`, ignoring parameters
fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Extracts raw `href` values of every anchor element, in document order
///
/// The element tree is walked with an explicit stack, so deeply nested
/// documents cannot exhaust the call stack. Anchors without an `href`, or
/// with an empty one, are skipped.
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use sumi_crawl::crawler::extract_links;
///
/// let document = Html::parse_document(r#"<p><a href="/a">A</a><a href="">x</a><a href="b">B</a></p>"#);
/// assert_eq!(extract_links(&document), vec!["/a", "b"]);
/// ```
pub fn extract_links(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();
    let mut stack: Vec<ElementRef<'_>> = vec![document.root_element()];

    while let Some(element) = stack.pop() {
        if element.value().name() == "a" {
            if let Some(href) = element.value().attr("href") {
                if !href.is_empty() {
                    hrefs.push(href.to_string());
                }
            }
        }

        // Children pushed in reverse so the first child is visited next
        let children: Vec<ElementRef<'_>> =
            element.children().filter_map(ElementRef::wrap).collect();
        stack.extend(children.into_iter().rev());
    }

    hrefs
}

/// Parses a page and returns its resolved outbound links
///
/// Relative links resolve against the page's final URL. The parsed
/// document does not outlive this call.
pub fn discover_links(page: &FetchedPage) -> Result<Vec<Url>, ParseError> {
    let hrefs = {
        let document = parse_page(page)?;
        extract_links(&document)
    };
    Ok(resolve_links(&hrefs, &page.final_url))
}
