// src/extract/html.rs
// =============================================================================
// This module extracts link references from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a crawler we do not resolve the references here; they are returned
// exactly as written and resolved later against the file they came from.
// =============================================================================

use super::is_checkable_link;
use scraper::{Html, Selector};

// Elements and the attribute holding their link target.
const LINK_ATTRIBUTES: [(&str, &str); 2] = [("a[href]", "href"), ("img[src]", "src")];

// Extracts all checkable link references from HTML content, in document
// order per element kind (anchors first, then images).
//
// Example:
//   html = "<a href='guide.html#setup'>Setup</a>"
//   result = ["guide.html#setup"]
pub fn extract_html_links(html: &str) -> Vec<String> {
    let mut links = Vec::new();

    // Parse the HTML into a document
    let document = Html::parse_document(html);

    for (selector, attribute) in LINK_ATTRIBUTES {
        // The selectors are constants, but a parse failure is still not worth
        // a panic: skip that element kind instead.
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(target) = element.value().attr(attribute) {
                let target = target.trim();
                if is_checkable_link(target) {
                    links.push(target.to_string());
                }
            }
        }
    }

    links
}
