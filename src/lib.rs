// src/lib.rs
// =============================================================================
// linkwatch: checks the links and anchors in Markdown and HTML documents.
//
// For every link found in a document we decide whether its target exists:
// - a remote URL answers a HEAD request without an error status
// - a local file exists on disk
// - an anchor (#fragment) is defined in the document it points into
//
// Modules, leaf first:
// - gate: limits how many remote probes run at once
// - anchors: parses documents once and remembers their anchor ids
// - resolve: turns a raw reference into a local path or a remote URL
// - checker: checks one reference, or all references of a document
// - config / error: shared settings and error kinds
// - extract / documents: find documents and the links inside them
// =============================================================================

pub mod anchors;
pub mod checker;
pub mod config;
pub mod documents;
pub mod error;
pub mod extract;
pub mod gate;
pub mod logging;
pub mod resolve;

pub use anchors::{AnchorCache, AnchorOptions};
pub use checker::{LinkChecker, LinkResult};
pub use config::CheckerConfig;
pub use error::CheckError;
pub use gate::{ConcurrencyGate, GatePermit};
pub use resolve::{resolve_target, ResolvedTarget};
