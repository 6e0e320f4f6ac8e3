// src/anchors/mod.rs
// =============================================================================
// The anchor cache: answers "does document D define anchor A?"
//
// Every document is read, rendered and parsed at most once. The resulting
// set of ids is kept for the rest of the run and shared by every check,
// since documents are not expected to change while we are running.
//
// How it works:
// 1. A map from document path to a per-document once-cell
// 2. The map lock is only held long enough to find or insert the cell
// 3. The cell runs the parse exactly once; concurrent callers for the same
//    document wait on it, callers for other documents do not
// 4. A failed parse leaves the cell empty, so the next caller tries again
//
// Submodules:
// - render: Markdown -> HTML with generated heading ids
// =============================================================================

mod render;

pub use render::{render_markdown, slugify};

use crate::error::CheckError;
use crate::resolve::clean_path;
use scraper::Html;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::debug;

/// The anchors defined by one document.
pub type AnchorSet = Arc<HashSet<String>>;

/// Rendering options for the cache.
#[derive(Debug, Clone, Copy)]
pub struct AnchorOptions {
    /// Give Markdown headings an id derived from their text.
    pub auto_heading_ids: bool,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            auto_heading_ids: true,
        }
    }
}

/// Kinds of documents we know how to collect anchors from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Markdown,
    Html,
}

impl MarkupKind {
    /// Classifies a document by its file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "md" | "markdown" => Some(MarkupKind::Markdown),
            "html" | "htm" => Some(MarkupKind::Html),
            _ => None,
        }
    }
}

/// Returns true for file names we can parse for anchors.
pub fn is_markup_file(path: &Path) -> bool {
    MarkupKind::from_path(path).is_some()
}

/// Memoized anchor sets, keyed by document path.
#[derive(Debug, Default)]
pub struct AnchorCache {
    options: AnchorOptions,
    entries: Mutex<HashMap<PathBuf, Arc<OnceCell<AnchorSet>>>>,
    parses: AtomicUsize,
}

impl AnchorCache {
    /// Creates an empty cache that generates heading ids.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnchorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Checks that `document` defines `anchor`.
    pub async fn check_anchor(&self, document: &Path, anchor: &str) -> Result<(), CheckError> {
        let anchors = self.anchors(document).await?;
        if anchors.contains(anchor) {
            Ok(())
        } else {
            Err(CheckError::AnchorNotFound(anchor.to_string()))
        }
    }

    /// Returns the anchor set of `document`, parsing it on first use.
    pub async fn anchors(&self, document: &Path) -> Result<AnchorSet, CheckError> {
        let key = clean_path(document);
        let cell = self.cell_for(&key);
        let anchors = cell.get_or_try_init(|| self.parse(&key)).await?;
        Ok(Arc::clone(anchors))
    }

    /// How many times a document was actually read and parsed.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }

    fn cell_for(&self, key: &Path) -> Arc<OnceCell<AnchorSet>> {
        // No code panics while holding this lock, but a poisoned map is still
        // perfectly usable, so don't let poisoning spread.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key.to_path_buf()).or_default())
    }

    async fn parse(&self, document: &Path) -> Result<AnchorSet, CheckError> {
        self.parses.fetch_add(1, Ordering::SeqCst);

        let bytes = tokio::fs::read(document)
            .await
            .map_err(|e| CheckError::io(document, &e))?;

        let kind = MarkupKind::from_path(document).ok_or_else(|| {
            CheckError::Format(format!("{}: not a markup file", document.display()))
        })?;

        let text = String::from_utf8_lossy(&bytes);
        let html = match kind {
            MarkupKind::Markdown => render_markdown(&text, self.options.auto_heading_ids),
            MarkupKind::Html => text.into_owned(),
        };

        let anchors = collect_ids(&html);
        debug!(
            document = %document.display(),
            anchors = anchors.len(),
            "parsed document for anchors"
        );

        Ok(Arc::new(anchors))
    }
}

/// Collects the value of every `id` attribute in an HTML document, walking
/// the tree depth-first.
pub fn collect_ids(html: &str) -> HashSet<String> {
    let document = Html::parse_document(html);

    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_element())
        .filter_map(|element| element.attr("id"))
        .map(str::to_owned)
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio's OnceCell and not a plain HashMap<PathBuf, HashSet>?
//    - get_or_try_init() runs the parse for the first caller only; others
//      await the same result instead of parsing again
//    - If the parse fails, the cell stays empty and a later call retries
//
// 2. Why a std Mutex in async code?
//    - It is only held to look up or insert a cell, never across an .await
//
// 3. Why Arc<HashSet<String>>?
//    - Every caller gets a cheap handle to the same set, no copying
// -----------------------------------------------------------------------------
