// src/config.rs
// =============================================================================
// Settings shared by every check.
//
// A CheckerConfig is built once (by the CLI, or by a test), wrapped in an
// Arc and then only ever read. It holds:
// - the timeout for remote probes (zero = wait forever)
// - the document root for "/rooted/paths" (optional)
// - an exclusion pattern; matching targets are never checked
// - the concurrency gate that limits simultaneous remote probes
// =============================================================================

use crate::gate::ConcurrencyGate;
use crate::resolve::clean_path;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default number of simultaneous remote probes.
pub const DEFAULT_CONCURRENCY: usize = 512;

/// Default timeout for one remote probe.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    timeout: Duration,
    document_root: Option<PathBuf>,
    exclude: Option<Regex>,
    gate: Arc<ConcurrencyGate>,
}

impl CheckerConfig {
    /// A configuration with the default timeout, no document root and no
    /// exclusions, sharing the given gate.
    pub fn new(gate: Arc<ConcurrencyGate>) -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            document_root: None,
            exclude: None,
            gate,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the document root. An empty path means "no root".
    pub fn with_document_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.document_root = if root.as_os_str().is_empty() {
            None
        } else {
            Some(clean_path(&root))
        };
        self
    }

    pub fn with_exclude(mut self, pattern: Regex) -> Self {
        self.exclude = Some(pattern);
        self
    }

    /// Probe timeout; None when probes may wait indefinitely.
    pub fn timeout(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    pub fn document_root(&self) -> Option<&Path> {
        self.document_root.as_deref()
    }

    /// True if `target` matches the exclusion pattern.
    pub fn is_excluded(&self, target: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(target))
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }
}
