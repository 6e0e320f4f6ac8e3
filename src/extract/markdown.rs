// src/extract/markdown.rs
// =============================================================================
// This module extracts link references from Markdown text.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is fast and memory-efficient (it's a streaming parser)
//
// Both links ([text](dest)) and images (![alt](src)) are collected, as
// written: relative paths and fragments are kept so the checker can resolve
// them against the document they came from.
// =============================================================================

use super::is_checkable_link;
use pulldown_cmark::{Event, Options, Parser, Tag};

// Extracts all checkable link references from Markdown text
//
// Example input:
//   "See [setup](#setup) and [Rust](https://www.rust-lang.org)!"
//
// Example output:
//   vec!["#setup", "https://www.rust-lang.org"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    let mut links = Vec::new();

    // Reference-style links ([text][ref]) arrive already resolved to their
    // destination, so a single pass over Start events is enough.
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES);

    for event in parser {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) | Event::Start(Tag::Image { dest_url, .. }) => {
                if is_checkable_link(&dest_url) {
                    links.push(dest_url.into_string());
                }
            }
            // We don't care about other events (text, headings, etc.)
            _ => {}
        }
    }

    links
}
