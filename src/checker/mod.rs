// src/checker/mod.rs
// =============================================================================
// This module decides whether a single link reference is valid.
//
// For one reference found in one document the checker:
// 1. Resolves it (see resolve.rs) into a local path or a remote URL
// 2. Skips it if it matches the exclusion pattern
// 3. Local: checks the file exists and, with a fragment, that the anchor
//    exists in that file (or in the referring document itself)
// 4. Remote: waits for a slot in the concurrency gate, then sends a HEAD
//    request and looks at the status code
//
// Submodules:
// - local: the filesystem + anchor side
// - remote: the HTTP side
// - batch: checks every link of a document concurrently
//
// Rust concepts:
// - Clone on a struct full of Arcs: every spawned task gets its own cheap
//   handle to the same config, anchor cache and HTTP client
// - impl blocks split across files: each submodule adds methods to
//   LinkChecker for its own concern
// =============================================================================

mod batch;
mod local;
mod remote;

#[cfg(test)]
mod testing;

pub use batch::LinkResult;

use crate::anchors::AnchorCache;
use crate::config::CheckerConfig;
use crate::error::CheckError;
use crate::resolve::{resolve_target, ResolvedTarget};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Checks link references against the filesystem, the anchor cache and the
/// network.
#[derive(Debug, Clone)]
pub struct LinkChecker {
    config: Arc<CheckerConfig>,
    anchors: Arc<AnchorCache>,
    client: Client,
}

impl LinkChecker {
    /// Creates a checker with its own HTTP client.
    pub fn new(config: CheckerConfig, anchors: Arc<AnchorCache>) -> reqwest::Result<Self> {
        let client = remote::build_client()?;
        Ok(Self::with_client(config, anchors, client))
    }

    /// Creates a checker that sends its probes through `client`.
    pub fn with_client(config: CheckerConfig, anchors: Arc<AnchorCache>, client: Client) -> Self {
        Self {
            config: Arc::new(config),
            anchors,
            client,
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn anchors(&self) -> &AnchorCache {
        &self.anchors
    }

    /// Checks `reference`, which was found in `document`.
    pub async fn check(&self, reference: &str, document: &Path) -> Result<(), CheckError> {
        let target = resolve_target(reference, document, self.config.document_root())?;

        if self.config.is_excluded(&target.as_str()) {
            debug!(reference, target = %target, "excluded, not checking");
            return Ok(());
        }

        match target {
            ResolvedTarget::Local { path, fragment } => {
                self.check_local(&path, fragment.as_deref(), document).await
            }
            ResolvedTarget::Remote { url } => self.check_remote(&url).await,
        }
    }
}
