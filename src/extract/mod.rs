// src/extract/mod.rs
// =============================================================================
// Finds the link references inside a document.
//
// Submodules:
// - markdown: links and images in Markdown (pulldown-cmark)
// - html: a[href] and img[src] in HTML (scraper)
//
// Only references we can check are returned: local ones (no scheme) and
// http/https URLs. mailto:, tel:, javascript: and friends are skipped.
// =============================================================================

mod html;
mod markdown;

pub use html::extract_html_links;
pub use markdown::extract_markdown_links;

use crate::anchors::MarkupKind;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Extracts the references from `content`, read from `path`.
///
/// Each reference appears once, at its first position. Files that are not
/// markup yield nothing.
pub fn extract_links(path: &Path, content: &str) -> Vec<String> {
    let links = match MarkupKind::from_path(path) {
        Some(MarkupKind::Markdown) => extract_markdown_links(content),
        Some(MarkupKind::Html) => extract_html_links(content),
        None => Vec::new(),
    };

    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

// Local references have no scheme; remote ones must be HTTP(S).
fn is_checkable_link(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => !link.is_empty(),
    }
}
