// src/error.rs
// =============================================================================
// Error kinds produced by the checking engine.
//
// Every check returns Result<(), CheckError>. Nothing here is logged or
// retried: the caller decides how to report a failure.
//
// We use the `thiserror` crate to derive Display and std::error::Error.
// Errors are Clone so a result can be handed to several consumers (the
// report printer and the JSON serializer, for example).
// =============================================================================

use thiserror::Error;

/// Why a single link reference failed to check out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The reference is not a valid URL or URL-reference.
    #[error("malformed reference: {0}")]
    Parse(String),

    /// The reference needs configuration that was not provided.
    #[error("{0}")]
    Configuration(String),

    /// A local file could not be read or does not exist.
    #[error("{0}")]
    Io(String),

    /// The document is not a markup file, so it has no anchors to look up.
    #[error("{0}")]
    Format(String),

    /// The document exists but does not define the requested anchor.
    #[error("anchor not found: #{0}")]
    AnchorNotFound(String),

    /// The remote probe failed at the transport level.
    #[error("{0}")]
    Network(String),

    /// The remote server answered with a failing status code.
    #[error("{reason} (HTTP error {code})")]
    HttpStatus { code: u16, reason: String },

    /// The check itself did not finish (its task panicked or was cancelled).
    #[error("{0}")]
    Internal(String),
}

impl CheckError {
    /// Short machine-friendly name of the error kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::Parse(_) => "parse",
            CheckError::Configuration(_) => "configuration",
            CheckError::Io(_) => "io",
            CheckError::Format(_) => "format",
            CheckError::AnchorNotFound(_) => "anchor_not_found",
            CheckError::Network(_) => "network",
            CheckError::HttpStatus { .. } => "http_status",
            CheckError::Internal(_) => "internal",
        }
    }

    // std::io::Error is not Clone, so we keep its message together with the
    // path it was about.
    pub(crate) fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        CheckError::Io(format!("{}: {}", path.display(), err))
    }
}
